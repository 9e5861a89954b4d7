// ==========================================
// 餐饮运营补货计划系统 - 配置层
// ==========================================
// 职责: 补货运行参数（服务水平、预测窗口、缺省提前期）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod replenishment_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use replenishment_config::{ReplenishmentConfig, ServiceLevel};
