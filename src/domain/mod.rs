// ==========================================
// 餐饮运营补货计划系统 - 领域模型层
// ==========================================
// 职责: 定义食单、销售、BOM、食材、库存与发注建议实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod bom;
pub mod ingredient;
pub mod inventory;
pub mod meal;
pub mod recommendation;
pub mod types;

// 重导出核心类型
pub use bom::BomLine;
pub use ingredient::{IngredientCatalog, IngredientDefaults, IngredientMaster};
pub use inventory::{InTransitQuantity, InventorySnapshot, PurchaseOrderLine, StockBalance};
pub use meal::{DayOfWeekStatistic, MealPlanEntry, SalesHistoryRecord};
pub use recommendation::{OrderCalculationLine, OrderRecommendation, SupplierOrderSummary};
pub use types::OrderStatus;
