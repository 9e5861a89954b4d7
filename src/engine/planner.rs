// ==========================================
// 餐饮运营补货计划系统 - 补货计划编排器
// ==========================================
// 流程: 需求预测 → BOM 展开 → 安全库存 → 净需求 → 状态判定/报告组装
// 红线: 单次运行同步、无 I/O、不修改输入; 相同输入产出相同报告
// ==========================================

use crate::config::ReplenishmentConfig;
use crate::domain::bom::BomLine;
use crate::domain::ingredient::{IngredientCatalog, IngredientMaster};
use crate::domain::inventory::{InTransitQuantity, InventorySnapshot};
use crate::domain::meal::{MealPlanEntry, SalesHistoryRecord};
use crate::domain::recommendation::OrderRecommendation;
use crate::engine::bom_expansion::BomExpander;
use crate::engine::demand_forecast::{DemandForecaster, ForecastIndex};
use crate::engine::net_requirement::{NetRequirement, NetRequirementResolver};
use crate::engine::report::ReportAssembler;
use crate::engine::safety_stock::SafetyStockCalculator;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

// ==========================================
// PlanningInputs - 计划运行的六类输入
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PlanningInputs {
    pub meal_plan: Vec<MealPlanEntry>,
    pub sales_history: Vec<SalesHistoryRecord>,
    pub bom: Vec<BomLine>,
    pub ingredient_master: Vec<IngredientMaster>,
    pub inventory: InventorySnapshot,
    pub in_transit: InTransitQuantity,
}

impl PlanningInputs {
    pub fn is_all_empty(&self) -> bool {
        self.meal_plan.is_empty()
            && self.sales_history.is_empty()
            && self.bom.is_empty()
            && self.ingredient_master.is_empty()
            && self.inventory.is_empty()
            && self.in_transit.is_empty()
    }
}

// ==========================================
// ReplenishmentPlanner - 补货计划编排器
// ==========================================
pub struct ReplenishmentPlanner {
    config: ReplenishmentConfig,
    forecaster: DemandForecaster,
    expander: BomExpander,
    safety: SafetyStockCalculator,
}

impl ReplenishmentPlanner {
    pub fn new(config: ReplenishmentConfig) -> Self {
        Self {
            safety: SafetyStockCalculator::new(config.z_score()),
            forecaster: DemandForecaster::new(),
            expander: BomExpander::new(),
            config,
        }
    }

    pub fn config(&self) -> &ReplenishmentConfig {
        &self.config
    }

    /// 执行一次补货计划
    #[instrument(skip(self, inputs), fields(
        service_level = %self.config.service_level,
        meal_plan = inputs.meal_plan.len(),
        sales_history = inputs.sales_history.len(),
        bom = inputs.bom.len(),
    ))]
    pub fn plan(&self, inputs: &PlanningInputs, today: NaiveDate) -> OrderRecommendation {
        info!(%today, "开始执行补货计划");

        // 步骤1: 星期维度需求统计
        let stats = self.forecaster.compute_statistics(&inputs.sales_history);
        let forecast = ForecastIndex::new(&stats);

        // 步骤2: 菜单需求 + BOM 展开
        let menu_demand = self.expander.aggregate_menu_demand(&inputs.meal_plan, &forecast);
        let requirements = self.expander.explode(&menu_demand, &inputs.bom);

        // 步骤3/4: 安全库存 + 净需求
        let catalog = IngredientCatalog::new(&inputs.ingredient_master);
        let defaults = self.config.ingredient_defaults();
        let resolver = NetRequirementResolver::new(&inputs.inventory, &inputs.in_transit);

        let mut synthesized = 0usize;
        let results: Vec<NetRequirement> = requirements
            .into_values()
            .map(|requirement| {
                if catalog.find(&requirement.ingredient_key).is_none() {
                    synthesized += 1;
                    debug!(
                        ingredient = %requirement.ingredient_key,
                        "主数据缺失,使用默认参数"
                    );
                }
                let master = catalog.lookup_or_default(
                    &requirement.ingredient_key,
                    &requirement.ingredient_name,
                    &requirement.unit,
                    defaults,
                );
                let safety_stock =
                    self.safety
                        .calculate(requirement.std_dev, master.lead_time, master.safety_days);
                resolver.resolve(requirement, master, safety_stock)
            })
            .collect();

        info!(
            statistics = stats.len(),
            menus = menu_demand.len(),
            ingredients = results.len(),
            synthesized_masters = synthesized,
            "需求计算完成"
        );

        // 步骤5: 状态判定 + 报告组装
        ReportAssembler::new(&self.config).assemble(results, today)
    }
}
