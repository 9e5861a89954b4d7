// ==========================================
// 餐饮运营补货计划系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod erp_inventory_repo;
pub mod error;
pub mod recommendation_repo;

// 重导出核心仓储
pub use erp_inventory_repo::ErpInventoryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use recommendation_repo::{RecommendationRepository, ReportSummary};
