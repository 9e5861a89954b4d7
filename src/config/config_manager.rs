// ==========================================
// 餐饮运营补货计划系统 - 配置管理器
// ==========================================
// 职责: 配置加载、覆写管理 → 生成不可变 ReplenishmentConfig
// 存储: config_kv 表 (key-value + scope)
// 红线: 非法配置值回退默认值并告警,不中止计划
// ==========================================

use crate::config::replenishment_config::{ReplenishmentConfig, ServiceLevel};
use crate::db::open_sqlite_connection;
use crate::domain::types::MAX_PLANNING_DAYS;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    // ===== 补货配置 =====

    /// 加载补货运行配置（每次返回新的不可变值）
    pub fn load_replenishment_config(&self) -> RepositoryResult<ReplenishmentConfig> {
        let defaults = ReplenishmentConfig::default();

        let service_level = match self.get_config_value(config_keys::SERVICE_LEVEL_PCT)? {
            Some(raw) => match raw.trim().parse::<f64>().ok().and_then(ServiceLevel::from_percent) {
                Some(level) => level,
                None => {
                    warn!(value = %raw, "服务水平配置非法,使用默认值 95%");
                    defaults.service_level
                }
            },
            None => defaults.service_level,
        };

        let forecast_weeks = self.get_u32_or_default(
            config_keys::FORECAST_WEEKS,
            defaults.forecast_weeks,
            MAX_PLANNING_DAYS / 7,
        )?;
        let default_lead_time_days = self.get_u32_or_default(
            config_keys::DEFAULT_LEAD_TIME_DAYS,
            defaults.default_lead_time_days,
            MAX_PLANNING_DAYS,
        )?;
        let default_safety_days = self.get_u32_or_default(
            config_keys::DEFAULT_SAFETY_DAYS,
            defaults.default_safety_days,
            MAX_PLANNING_DAYS,
        )?;
        let source_sheet_id = self
            .get_config_value(config_keys::SOURCE_SHEET_ID)?
            .unwrap_or(defaults.source_sheet_id.clone());
        let report_locale = self
            .get_config_value(config_keys::REPORT_LOCALE)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.report_locale.clone());

        Ok(defaults
            .with_service_level(service_level)
            .with_forecast_weeks(forecast_weeks)
            .with_default_lead_time(default_lead_time_days)
            .with_default_safety_days(default_safety_days)
            .with_source_sheet_id(source_sheet_id)
            .with_report_locale(report_locale))
    }

    /// 设置服务水平（Z 值随之派生）
    pub fn set_service_level(&self, level: ServiceLevel) -> RepositoryResult<()> {
        self.set_config_value(config_keys::SERVICE_LEVEL_PCT, &level.percent().to_string())
    }

    /// 读取 [0, max] 范围内的整数配置,非法或越界时回退默认值
    fn get_u32_or_default(&self, key: &str, default: u32, max: u32) -> RepositoryResult<u32> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(v) if v <= max => Ok(v),
                Ok(_) => {
                    warn!(key, value = %raw, max, default, "配置值超出范围,使用默认值");
                    Ok(default)
                }
                Err(_) => {
                    warn!(key, value = %raw, default, "配置值非法,使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 服务水平（百分比: 90/95/97/99）
    pub const SERVICE_LEVEL_PCT: &str = "service_level_pct";

    // 预测窗口（周）
    pub const FORECAST_WEEKS: &str = "forecast_weeks";

    // 主数据缺省参数
    pub const DEFAULT_LEAD_TIME_DAYS: &str = "default_lead_time_days";
    pub const DEFAULT_SAFETY_DAYS: &str = "default_safety_days";

    // 表格数据源标识（CSV 目录或工作簿路径）
    pub const SOURCE_SHEET_ID: &str = "source_sheet_id";

    // 报告语言
    pub const REPORT_LOCALE: &str = "report_locale";
}
