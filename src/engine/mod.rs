// ==========================================
// 餐饮运营补货计划系统 - 引擎层
// ==========================================
// 职责: 需求预测 → BOM 展开 → 安全库存 → 净需求 → 状态分级 → 报告组装
// 红线: Engine 不拼 SQL,不做 I/O; 相同输入必须得到相同报告
// ==========================================

pub mod bom_expansion;
pub mod demand_forecast;
pub mod math;
pub mod net_requirement;
pub mod planner;
pub mod report;
pub mod safety_stock;
pub mod status;

// 重导出核心引擎
pub use bom_expansion::{BomExpander, IngredientRequirement, MenuDemand};
pub use demand_forecast::{DemandForecaster, ForecastIndex};
pub use net_requirement::{NetRequirement, NetRequirementResolver};
pub use planner::{PlanningInputs, ReplenishmentPlanner};
pub use report::ReportAssembler;
pub use safety_stock::SafetyStockCalculator;
pub use status::StatusClassifier;
