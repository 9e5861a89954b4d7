// ==========================================
// 餐饮运营补货计划系统 - API 层
// ==========================================
// 职责: 提供补货建议的业务接口,供 CLI 调用
// ==========================================

pub mod error;
pub mod replenishment_api;
pub mod report_export;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use replenishment_api::{
    PlanningOutcome, PlanningWindow, ReplenishmentApi, SourceCoverage, SourceStatus,
};
pub use report_export::{write_order_lines, write_order_lines_csv};
