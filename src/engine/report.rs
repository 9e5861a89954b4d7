// ==========================================
// 餐饮运营补货计划系统 - 补货建议报告组装
// ==========================================
// 职责: 净需求 → 状态判定 → 输出行取整 → 排序 → 汇总
// 排序: SHORTAGE → URGENT → NORMAL → OVERSTOCK（同级保持输入顺序）
// ==========================================

use crate::config::ReplenishmentConfig;
use crate::domain::recommendation::{OrderCalculationLine, OrderRecommendation};
use crate::domain::types::{shift_days, OrderStatus};
use crate::engine::math::{round_qty, round_to};
use crate::engine::net_requirement::NetRequirement;
use crate::engine::status::{days_of_stock, StatusClassifier, StatusInput, DAYS_OF_STOCK_SENTINEL};
use crate::i18n;
use chrono::NaiveDate;
use tracing::{info, instrument};

/// 目标期间长度（天）
pub const TARGET_PERIOD_DAYS: i64 = 7;

// ==========================================
// ReportAssembler - 报告组装器
// ==========================================
pub struct ReportAssembler<'a> {
    config: &'a ReplenishmentConfig,
    classifier: StatusClassifier,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(config: &'a ReplenishmentConfig) -> Self {
        Self {
            config,
            classifier: StatusClassifier::new(),
        }
    }

    /// 组装最终报告
    #[instrument(skip(self, results), fields(lines = results.len()))]
    pub fn assemble(&self, results: Vec<NetRequirement>, today: NaiveDate) -> OrderRecommendation {
        let mut items: Vec<OrderCalculationLine> =
            results.into_iter().map(|r| self.build_line(r)).collect();
        // sort_by_key 为稳定排序
        items.sort_by_key(|line| line.status.priority_rank());

        let shortage_items = items
            .iter()
            .filter(|line| line.status == OrderStatus::Shortage)
            .count();
        let urgent_items = items.iter().filter(|line| line.status.is_urgent()).count();
        let total_estimated_cost: f64 = items.iter().map(|line| line.estimated_cost).sum();

        let lead_time_days = self.config.default_lead_time_days;
        let target_period_start = shift_days(today, i64::from(lead_time_days));
        let target_period_end = shift_days(target_period_start, TARGET_PERIOD_DAYS);

        info!(
            total_items = items.len(),
            urgent_items,
            shortage_items,
            total_estimated_cost,
            "补货建议报告组装完成"
        );

        OrderRecommendation {
            order_date: today,
            delivery_date: target_period_start,
            target_period_start,
            target_period_end,
            total_items: items.len(),
            urgent_items,
            shortage_items,
            total_estimated_cost,
            service_level: self.config.service_level.percent() as f64,
            z_score: self.config.z_score(),
            forecast_weeks: self.config.forecast_weeks,
            lead_time_days,
            items,
        }
    }

    /// 单行: 状态判定 + 输出取整
    pub fn build_line(&self, result: NetRequirement) -> OrderCalculationLine {
        let days = days_of_stock(result.available_stock, result.requirement.gross_qty);
        let status = self.classifier.classify(&StatusInput {
            days_of_stock: days,
            lead_time: result.master.lead_time,
            net_requirement: result.net_requirement,
            available_stock: result.available_stock,
            total_requirement: result.total_requirement,
        });

        let order_qty = finalize_order_qty(
            result.order_qty,
            result.master.moq,
            result.master.packaging_unit,
        );
        let estimated_cost = round_qty(order_qty * result.master.unit_price);
        let avg_daily_sales = round_to(result.avg_daily_demand(), 1);
        let days_display = if days >= DAYS_OF_STOCK_SENTINEL {
            DAYS_OF_STOCK_SENTINEL
        } else {
            round_to(days, 1)
        };
        let status_message = self.status_message(status, days_display);

        let NetRequirement {
            requirement,
            master,
            safety_stock,
            total_requirement,
            on_hand,
            in_transit,
            available_stock,
            net_requirement,
            ..
        } = result;

        OrderCalculationLine {
            ingredient_code: master.ingredient_code,
            ingredient_name: master.ingredient_name,
            category: master.category,
            unit: if master.unit.is_empty() {
                requirement.unit
            } else {
                master.unit
            },
            supplier_code: master.supplier_code,
            supplier_name: master.supplier_name,
            contributing_menus: requirement.contributing_menus,
            avg_daily_sales,
            std_dev: round_to(requirement.std_dev, 1),
            gross_requirement: round_qty(requirement.gross_qty),
            safety_stock: round_qty(safety_stock),
            total_requirement: round_qty(total_requirement),
            current_stock: round_qty(on_hand),
            in_transit: round_qty(in_transit),
            available_stock: round_qty(available_stock),
            net_requirement: round_qty(net_requirement),
            moq: master.moq,
            packaging_unit: master.packaging_unit,
            order_qty,
            unit_price: master.unit_price,
            estimated_cost,
            lead_time: master.lead_time,
            safety_days: master.safety_days,
            days_of_stock: days_display,
            status,
            status_message,
        }
    }

    fn status_message(&self, status: OrderStatus, days: f64) -> String {
        let days_text = if days.fract() == 0.0 {
            format!("{}", days as i64)
        } else {
            format!("{:.1}", days)
        };
        i18n::t_with_args_in(
            &self.config.report_locale,
            status.message_key(),
            &[("days", days_text.as_str())],
        )
    }
}

/// 订货量写入输出行
///
/// - 包装单位 > 1: 已是整包倍数,只消除浮点噪声
/// - 否则取整,取整结果低于 MOQ 时向上取整
fn finalize_order_qty(order_qty: f64, moq: f64, packaging_unit: f64) -> f64 {
    if order_qty <= 0.0 {
        return 0.0;
    }
    if packaging_unit > 1.0 {
        return round_to(order_qty, 6);
    }
    let rounded = round_qty(order_qty);
    if rounded < moq {
        order_qty.ceil()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_order_qty_keeps_moq() {
        assert_eq!(finalize_order_qty(0.0, 10.0, 1.0), 0.0);
        assert_eq!(finalize_order_qty(274.3, 1.0, 1.0), 274.0);
        assert_eq!(finalize_order_qty(2.45, 2.4, 1.0), 3.0);
        assert_eq!(finalize_order_qty(7.5, 2.5, 2.5), 7.5);
        assert_eq!(finalize_order_qty(280.0, 1.0, 10.0), 280.0);
    }
}
