// ==========================================
// 餐饮运营补货计划系统 - 核心库
// ==========================================
// 流程: 需求预测 → BOM 展开 → 安全库存 → 净需求 → 状态分级 → 发注建议
// 技术栈: Rust + SQLite + CSV/Excel 表格数据源
// 系统定位: 决策支持系统 (采购人员最终确认下单)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ko");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 计算规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::OrderStatus;

// 领域实体
pub use domain::{
    BomLine, DayOfWeekStatistic, IngredientMaster, InTransitQuantity, InventorySnapshot,
    MealPlanEntry, OrderCalculationLine, OrderRecommendation, SalesHistoryRecord,
    SupplierOrderSummary,
};

// 配置
pub use config::{ConfigManager, ReplenishmentConfig, ServiceLevel};

// 引擎
pub use engine::{PlanningInputs, ReplenishmentPlanner};

// API
pub use api::{PlanningOutcome, ReplenishmentApi, SourceCoverage};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "餐饮运营补货计划系统";
