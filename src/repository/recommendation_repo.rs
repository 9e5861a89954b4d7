// ==========================================
// 餐饮运营补货计划系统 - 补货建议报告仓储
// ==========================================
// 职责: replenishment_report 表的保存与查询
// 存储: 汇总列 + 完整报告 JSON
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::recommendation::OrderRecommendation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// ReportSummary - 报告列表项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub report_id: String,
    pub order_date: NaiveDate,
    pub service_level: f64,
    pub total_items: usize,
    pub urgent_items: usize,
    pub shortage_items: usize,
    pub total_estimated_cost: f64,
    pub created_at: String,
}

// ==========================================
// RecommendationRepository - 报告仓储
// ==========================================
pub struct RecommendationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RecommendationRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存报告快照
    ///
    /// # 返回
    /// - Ok(String): 新生成的 report_id
    pub fn save(&self, report: &OrderRecommendation) -> RepositoryResult<String> {
        let report_id = Uuid::new_v4().to_string();
        let report_json = serde_json::to_string(report)?;
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO replenishment_report (
                report_id, order_date, service_level,
                total_items, urgent_items, shortage_items,
                total_estimated_cost, report_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                report_id,
                report.order_date.to_string(),
                report.service_level,
                report.total_items as i64,
                report.urgent_items as i64,
                report.shortage_items as i64,
                report.total_estimated_cost,
                report_json,
                created_at,
            ],
        )?;

        Ok(report_id)
    }

    /// 按 report_id 读取完整报告
    pub fn find_by_id(&self, report_id: &str) -> RepositoryResult<Option<OrderRecommendation>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT report_json FROM replenishment_report WHERE report_id = ?1",
                params![report_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 最近的报告列表（按下单日期、创建时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ReportSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT report_id, order_date, service_level,
                   total_items, urgent_items, shortage_items,
                   total_estimated_cost, created_at
            FROM replenishment_report
            ORDER BY order_date DESC, created_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let order_date: String = row.get(1)?;
            Ok((
                row.get::<_, String>(0)?,
                order_date,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (report_id, order_date, service_level, total, urgent, shortage, cost, created_at) =
                row?;
            let order_date = NaiveDate::parse_from_str(&order_date, "%Y-%m-%d").map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "order_date".to_string(),
                    message: e.to_string(),
                }
            })?;
            summaries.push(ReportSummary {
                report_id,
                order_date,
                service_level,
                total_items: total.max(0) as usize,
                urgent_items: urgent.max(0) as usize,
                shortage_items: shortage.max(0) as usize,
                total_estimated_cost: cost,
                created_at,
            });
        }
        Ok(summaries)
    }
}
