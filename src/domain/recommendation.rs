// ==========================================
// 餐饮运营补货计划系统 - 补货建议领域模型
// ==========================================
// 职责: 补货计算行 + 建议报告（计划运行的唯一产出）
// 红线: 报告组装后不可变更
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 无供应商信息时的分组键
pub const UNKNOWN_SUPPLIER: &str = "미지정";

// ==========================================
// OrderCalculationLine - 食材补货计算行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCalculationLine {
    // ===== 食材信息 =====
    pub ingredient_code: String,
    pub ingredient_name: String,
    pub category: String,
    pub unit: String,
    pub supplier_code: Option<String>,
    pub supplier_name: Option<String>,
    pub contributing_menus: Vec<String>,

    // ===== 需求预测 =====
    pub avg_daily_sales: f64,
    pub std_dev: f64,
    pub gross_requirement: f64,
    pub safety_stock: f64,
    pub total_requirement: f64,

    // ===== 供给 =====
    pub current_stock: f64,
    pub in_transit: f64,
    pub available_stock: f64,

    // ===== 净需求与订货 =====
    pub net_requirement: f64,
    pub moq: f64,
    pub packaging_unit: f64,
    pub order_qty: f64,
    pub unit_price: f64,
    pub estimated_cost: f64,

    // ===== 参数回显 =====
    pub lead_time: u32,
    pub safety_days: u32,

    // ===== 状态 =====
    pub days_of_stock: f64,
    pub status: OrderStatus,
    pub status_message: String,
}

// ==========================================
// SupplierOrderSummary - 供应商维度汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderSummary {
    pub supplier_code: String,
    pub supplier_name: String,
    pub item_count: usize,
    pub urgent_count: usize,
    pub total_estimated_cost: f64,
    pub ingredient_codes: Vec<String>,
}

// ==========================================
// OrderRecommendation - 补货建议报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecommendation {
    // ===== 计划窗口 =====
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub target_period_start: NaiveDate,
    pub target_period_end: NaiveDate,

    // ===== 汇总 =====
    pub total_items: usize,
    pub urgent_items: usize,
    pub shortage_items: usize,
    pub total_estimated_cost: f64,

    // ===== 配置回显 =====
    pub service_level: f64,
    pub z_score: f64,
    pub forecast_weeks: u32,
    pub lead_time_days: u32,

    pub items: Vec<OrderCalculationLine>,
}

impl OrderRecommendation {
    /// 需要下单的行
    pub fn lines_to_order(&self) -> impl Iterator<Item = &OrderCalculationLine> {
        self.items.iter().filter(|line| line.order_qty > 0.0)
    }

    pub fn count_by_status(&self, status: OrderStatus) -> usize {
        self.items.iter().filter(|line| line.status == status).count()
    }

    /// 按供应商汇总需下单的行（金额降序,金额相同按供应商代码）
    pub fn supplier_summaries(&self) -> Vec<SupplierOrderSummary> {
        let mut groups: BTreeMap<String, SupplierOrderSummary> = BTreeMap::new();

        for line in self.lines_to_order() {
            let code = line
                .supplier_code
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNKNOWN_SUPPLIER)
                .to_string();
            let name = line
                .supplier_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| code.clone());

            let summary = groups
                .entry(code.clone())
                .or_insert_with(|| SupplierOrderSummary {
                    supplier_code: code,
                    supplier_name: name,
                    item_count: 0,
                    urgent_count: 0,
                    total_estimated_cost: 0.0,
                    ingredient_codes: Vec::new(),
                });

            summary.item_count += 1;
            if line.status.is_urgent() {
                summary.urgent_count += 1;
            }
            summary.total_estimated_cost += line.estimated_cost;
            summary.ingredient_codes.push(line.ingredient_code.clone());
        }

        let mut summaries: Vec<SupplierOrderSummary> = groups.into_values().collect();
        summaries.sort_by(|a, b| {
            b.total_estimated_cost
                .total_cmp(&a.total_estimated_cost)
                .then_with(|| a.supplier_code.cmp(&b.supplier_code))
        });
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(code: &str, supplier: Option<&str>, cost: f64, status: OrderStatus) -> OrderCalculationLine {
        OrderCalculationLine {
            ingredient_code: code.to_string(),
            ingredient_name: code.to_string(),
            category: "채소".to_string(),
            unit: "kg".to_string(),
            supplier_code: supplier.map(str::to_string),
            supplier_name: supplier.map(|s| format!("{}-상사", s)),
            contributing_menus: Vec::new(),
            avg_daily_sales: 0.0,
            std_dev: 0.0,
            gross_requirement: 0.0,
            safety_stock: 0.0,
            total_requirement: 0.0,
            current_stock: 0.0,
            in_transit: 0.0,
            available_stock: 0.0,
            net_requirement: 0.0,
            moq: 1.0,
            packaging_unit: 1.0,
            order_qty: if cost > 0.0 { 1.0 } else { 0.0 },
            unit_price: cost,
            estimated_cost: cost,
            lead_time: 2,
            safety_days: 1,
            days_of_stock: 0.0,
            status,
            status_message: String::new(),
        }
    }

    fn report(items: Vec<OrderCalculationLine>) -> OrderRecommendation {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        OrderRecommendation {
            order_date: today,
            delivery_date: today,
            target_period_start: today,
            target_period_end: today,
            total_items: items.len(),
            urgent_items: 0,
            shortage_items: 0,
            total_estimated_cost: 0.0,
            service_level: 95.0,
            z_score: 1.65,
            forecast_weeks: 4,
            lead_time_days: 2,
            items,
        }
    }

    #[test]
    fn test_supplier_summaries_grouped_by_cost() {
        let report = report(vec![
            line("I01", Some("S01"), 500.0, OrderStatus::Shortage),
            line("I02", Some("S02"), 3000.0, OrderStatus::Normal),
            line("I03", Some("S01"), 700.0, OrderStatus::Urgent),
            line("I04", None, 100.0, OrderStatus::Normal),
            line("I05", Some("S03"), 0.0, OrderStatus::Overstock),
        ]);

        let summaries = report.supplier_summaries();
        let codes: Vec<&str> = summaries.iter().map(|s| s.supplier_code.as_str()).collect();
        assert_eq!(codes, vec!["S02", "S01", UNKNOWN_SUPPLIER]);

        let s01 = &summaries[1];
        assert_eq!(s01.item_count, 2);
        assert_eq!(s01.urgent_count, 2);
        assert_eq!(s01.total_estimated_cost, 1200.0);
        assert_eq!(s01.ingredient_codes, vec!["I01", "I03"]);
        assert_eq!(s01.supplier_name, "S01-상사");

        assert_eq!(summaries[2].supplier_name, UNKNOWN_SUPPLIER);
        assert_eq!(report.count_by_status(OrderStatus::Normal), 2);
    }
}
