// ==========================================
// 餐饮运营补货计划系统 - BOM 展开引擎
// ==========================================
// 职责: 食单 → 菜单需求 → 食材毛需求 + 需求不确定度
// 规则:
// - 菜单需求累加: 数量求和, 标准差平方和开方（日需求视为不相关）
// - BOM 展开: 标准差乘以配方系数（线性,配方量为常数）
// - 食材累加: 数量求和, 标准差平方和开方（不同菜单视为独立来源）
// 红线: 单层 BOM; 未在食单中出现的菜单不产生需求
// ==========================================

use crate::domain::bom::BomLine;
use crate::domain::meal::MealPlanEntry;
use crate::engine::demand_forecast::ForecastIndex;
use crate::engine::math::combine_in_quadrature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// 无历史统计时的默认份数
pub const FALLBACK_DEMAND_QTY: f64 = 100.0;

/// 无历史统计时的默认标准差
pub const FALLBACK_DEMAND_STD_DEV: f64 = 20.0;

// ==========================================
// MenuDemand - 菜单需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDemand {
    pub menu_key: String,
    pub menu_name: String,
    pub qty: f64,
    pub std_dev: f64,
    pub planned_slots: usize,   // 食单条目数
    pub fallback_slots: usize,  // 其中走回退逻辑的条目数
}

// ==========================================
// IngredientRequirement - 食材毛需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequirement {
    pub ingredient_key: String,
    pub ingredient_name: String,
    pub unit: String,
    pub gross_qty: f64,
    pub std_dev: f64,
    pub contributing_menus: Vec<String>,
}

// ==========================================
// BomExpander - BOM 展开引擎
// ==========================================
pub struct BomExpander;

impl BomExpander {
    pub fn new() -> Self {
        Self
    }

    /// 步骤A: 食单条目 → 菜单需求
    ///
    /// 命中统计: qty = avg_sales, σ = std_dev
    /// 未命中: qty = planned_qty（缺失时 100）, σ = 20
    #[instrument(skip(self, meal_plan, forecast), fields(entries = meal_plan.len()))]
    pub fn aggregate_menu_demand(
        &self,
        meal_plan: &[MealPlanEntry],
        forecast: &ForecastIndex<'_>,
    ) -> BTreeMap<String, MenuDemand> {
        let mut demand: BTreeMap<String, MenuDemand> = BTreeMap::new();

        for entry in meal_plan {
            let key = entry.menu_key();
            if key.is_empty() {
                continue;
            }

            let (qty, std_dev, is_fallback) = match forecast.get(&key, entry.weekday) {
                Some(stat) => (stat.avg_sales, stat.std_dev, false),
                None => (
                    entry.planned_qty.unwrap_or(FALLBACK_DEMAND_QTY),
                    FALLBACK_DEMAND_STD_DEV,
                    true,
                ),
            };

            let item = demand.entry(key.clone()).or_insert_with(|| MenuDemand {
                menu_key: key,
                menu_name: entry.menu_name.clone(),
                qty: 0.0,
                std_dev: 0.0,
                planned_slots: 0,
                fallback_slots: 0,
            });
            item.qty += qty;
            item.std_dev = combine_in_quadrature(item.std_dev, std_dev);
            item.planned_slots += 1;
            if is_fallback {
                item.fallback_slots += 1;
            }
        }

        debug!(menus = demand.len(), "菜单需求汇总完成");
        demand
    }

    /// 步骤B: 菜单需求 × BOM → 食材毛需求
    ///
    /// required = demand × recipe × (1 + loss/100)
    /// σ_required = σ_demand × recipe
    #[instrument(skip(self, menu_demand, bom), fields(menus = menu_demand.len(), bom_lines = bom.len()))]
    pub fn explode(
        &self,
        menu_demand: &BTreeMap<String, MenuDemand>,
        bom: &[BomLine],
    ) -> BTreeMap<String, IngredientRequirement> {
        let mut requirements: BTreeMap<String, IngredientRequirement> = BTreeMap::new();

        for line in bom {
            let ingredient_key = line.ingredient_key();
            if ingredient_key.is_empty() {
                continue;
            }

            for demand in Self::matching_demands(line, menu_demand) {
                let required_qty = demand.qty * line.required_qty * line.loss_factor();
                let required_std_dev = demand.std_dev * line.required_qty;

                let item = requirements
                    .entry(ingredient_key.clone())
                    .or_insert_with(|| IngredientRequirement {
                        ingredient_key: ingredient_key.clone(),
                        ingredient_name: line.ingredient_name.clone(),
                        unit: line.unit.clone(),
                        gross_qty: 0.0,
                        std_dev: 0.0,
                        contributing_menus: Vec::new(),
                    });
                item.gross_qty += required_qty;
                item.std_dev = combine_in_quadrature(item.std_dev, required_std_dev);
                if !item.contributing_menus.contains(&demand.menu_key) {
                    item.contributing_menus.push(demand.menu_key.clone());
                }
            }
        }

        debug!(ingredients = requirements.len(), "BOM 展开完成");
        requirements
    }

    /// BOM 行对应的菜单需求（code 与 name 指向同一键时只取一次）
    fn matching_demands<'a>(
        line: &BomLine,
        menu_demand: &'a BTreeMap<String, MenuDemand>,
    ) -> Vec<&'a MenuDemand> {
        let mut matched: Vec<&MenuDemand> = Vec::with_capacity(2);
        for key in [line.menu_code.as_str(), line.menu_name.as_str()] {
            if key.is_empty() {
                continue;
            }
            if let Some(demand) = menu_demand.get(key) {
                if !matched.iter().any(|d| d.menu_key == demand.menu_key) {
                    matched.push(demand);
                }
            }
        }
        matched
    }
}

impl Default for BomExpander {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::meal::DayOfWeekStatistic;
    use chrono::{NaiveDate, Weekday};

    fn entry(day: u32, menu_code: &str, planned: Option<f64>) -> MealPlanEntry {
        let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
        MealPlanEntry {
            date,
            weekday: chrono::Datelike::weekday(&date),
            meal_type: "중식".to_string(),
            corner: "A".to_string(),
            menu_code: menu_code.to_string(),
            menu_name: format!("{}-name", menu_code),
            planned_qty: planned,
        }
    }

    fn stat(menu_code: &str, weekday: Weekday, avg: f64, std_dev: f64) -> DayOfWeekStatistic {
        DayOfWeekStatistic {
            weekday,
            menu_code: menu_code.to_string(),
            menu_name: format!("{}-name", menu_code),
            avg_sales: avg,
            std_dev,
            max_sales: avg,
            min_sales: avg,
            sample_count: 4,
        }
    }

    fn bom(menu_code: &str, ingredient_code: &str, qty: f64, loss: f64) -> BomLine {
        BomLine {
            menu_code: menu_code.to_string(),
            menu_name: format!("{}-name", menu_code),
            ingredient_code: ingredient_code.to_string(),
            ingredient_name: format!("{}-name", ingredient_code),
            required_qty: qty,
            unit: "kg".to_string(),
            loss_rate: loss,
        }
    }

    #[test]
    fn test_fallback_when_statistic_missing() {
        let stats: Vec<DayOfWeekStatistic> = Vec::new();
        let index = ForecastIndex::new(&stats);
        // 2026-02-02 为周一
        let plan = vec![entry(2, "M001", None), entry(3, "M002", Some(60.0))];

        let demand = BomExpander::new().aggregate_menu_demand(&plan, &index);
        assert_eq!(demand["M001"].qty, FALLBACK_DEMAND_QTY);
        assert_eq!(demand["M001"].std_dev, FALLBACK_DEMAND_STD_DEV);
        assert_eq!(demand["M002"].qty, 60.0);
        assert_eq!(demand["M002"].fallback_slots, 1);
    }

    #[test]
    fn test_menu_demand_combines_std_dev_in_quadrature() {
        let stats = vec![
            stat("M001", Weekday::Mon, 50.0, 3.0),
            stat("M001", Weekday::Tue, 70.0, 4.0),
        ];
        let index = ForecastIndex::new(&stats);
        let plan = vec![entry(2, "M001", None), entry(3, "M001", None)];

        let demand = BomExpander::new().aggregate_menu_demand(&plan, &index);
        let m = &demand["M001"];
        assert_eq!(m.qty, 120.0);
        assert!((m.std_dev - 5.0).abs() < 1e-9, "3 ⊕ 4 应为 5,而不是 7");
        assert_eq!(m.planned_slots, 2);
        assert_eq!(m.fallback_slots, 0);
    }

    #[test]
    fn test_ingredient_std_dev_combines_across_menus_in_quadrature() {
        let stats = vec![
            stat("M001", Weekday::Mon, 10.0, 3.0),
            stat("M002", Weekday::Mon, 10.0, 4.0),
        ];
        let index = ForecastIndex::new(&stats);
        let plan = vec![entry(2, "M001", None), entry(2, "M002", None)];
        let expander = BomExpander::new();
        let demand = expander.aggregate_menu_demand(&plan, &index);

        let lines = vec![bom("M001", "I001", 1.0, 0.0), bom("M002", "I001", 1.0, 0.0)];
        let req = expander.explode(&demand, &lines);

        let onion = &req["I001"];
        assert_eq!(onion.gross_qty, 20.0);
        assert!((onion.std_dev - 5.0).abs() < 1e-9);
        assert_eq!(onion.contributing_menus, vec!["M001".to_string(), "M002".to_string()]);
    }

    #[test]
    fn test_explosion_applies_recipe_and_loss() {
        let stats: Vec<DayOfWeekStatistic> = Vec::new();
        let index = ForecastIndex::new(&stats);
        let plan = vec![entry(2, "M001", None)];
        let expander = BomExpander::new();
        let demand = expander.aggregate_menu_demand(&plan, &index);

        let req = expander.explode(&demand, &[bom("M001", "I001", 2.0, 5.0)]);
        let item = &req["I001"];
        assert!((item.gross_qty - 210.0).abs() < 1e-9);
        // 标准差线性放大: 20 × 2
        assert!((item.std_dev - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_bom_matches_menu_by_name() {
        let stats: Vec<DayOfWeekStatistic> = Vec::new();
        let index = ForecastIndex::new(&stats);
        let mut by_name = entry(2, "", Some(10.0));
        by_name.menu_name = "잡채".to_string();
        let expander = BomExpander::new();
        let demand = expander.aggregate_menu_demand(&[by_name], &index);

        let mut line = bom("", "I010", 0.5, 0.0);
        line.menu_name = "잡채".to_string();
        let req = expander.explode(&demand, &[line]);
        assert_eq!(req["I010"].gross_qty, 5.0);
    }

    #[test]
    fn test_unplanned_menu_contributes_nothing() {
        let stats: Vec<DayOfWeekStatistic> = Vec::new();
        let index = ForecastIndex::new(&stats);
        let plan = vec![entry(2, "M001", None)];
        let expander = BomExpander::new();
        let demand = expander.aggregate_menu_demand(&plan, &index);

        let req = expander.explode(
            &demand,
            &[bom("M001", "I001", 1.0, 0.0), bom("M999", "I002", 1.0, 0.0)],
        );
        assert!(req.contains_key("I001"));
        assert!(!req.contains_key("I002"));
    }
}
