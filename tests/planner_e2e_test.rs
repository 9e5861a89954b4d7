// ==========================================
// 补货计划端到端测试
// ==========================================
// 测试目标: 需求预测 → BOM 展开 → 安全库存 → 净需求 → 状态 → 报告
// ==========================================


use meal_ops_planner::config::{ReplenishmentConfig, ServiceLevel};
use meal_ops_planner::domain::{InTransitQuantity, InventorySnapshot, OrderStatus};
use meal_ops_planner::engine::{PlanningInputs, ReplenishmentPlanner};
use meal_ops_planner::logging;
use test_helpers::{bom_line, date, master, meal_entry, sale};

/// 单菜单单食材场景: 周一 100 份,无历史销售
fn single_ingredient_inputs(on_hand: f64) -> PlanningInputs {
    let mut inventory = InventorySnapshot::new();
    inventory.insert("I01", on_hand);

    PlanningInputs {
        meal_plan: vec![meal_entry(date(2026, 2, 9), "M01", Some(100.0))],
        sales_history: Vec::new(),
        bom: vec![bom_line("M01", "I01", 2.0, 5.0)],
        ingredient_master: vec![master("I01", 1.0, 10.0, 2, 1, 1000.0)],
        inventory,
        in_transit: InTransitQuantity::new(),
    }
}

#[test]
fn test_fallback_demand_to_packaged_order() {
    logging::init_test();
    let planner = ReplenishmentPlanner::new(ReplenishmentConfig::default());
    let report = planner.plan(&single_ingredient_inputs(50.0), date(2026, 2, 2));

    assert_eq!(report.total_items, 1);
    let line = &report.items[0];
    assert_eq!(line.ingredient_code, "I01");
    assert_eq!(line.gross_requirement, 210.0);
    assert_eq!(line.std_dev, 40.0);
    // 1.65 × 40 × √3 ≈ 114.3
    assert_eq!(line.safety_stock, 114.0);
    assert_eq!(line.total_requirement, 324.0);
    assert_eq!(line.available_stock, 50.0);
    assert_eq!(line.net_requirement, 274.0);
    assert_eq!(line.order_qty, 280.0);
    assert_eq!(line.estimated_cost, 280_000.0);
    assert_eq!(line.avg_daily_sales, 30.0);

    // 50 / (210 / 7) ≈ 1.7 天 < 交货周期 2 天
    assert_eq!(line.days_of_stock, 1.7);
    assert_eq!(line.status, OrderStatus::Shortage);
    assert_eq!(line.status_message, "재고 1.7일분 - 긴급발주 필요");

    assert_eq!(report.shortage_items, 1);
    assert_eq!(report.urgent_items, 1);
    assert_eq!(report.service_level, 95.0);
    assert_eq!(report.z_score, 1.65);
    assert_eq!(report.delivery_date, date(2026, 2, 4));
    assert_eq!(report.target_period_end, date(2026, 2, 11));
}

#[test]
fn test_repeat_runs_produce_identical_reports() {
    let mut inputs = single_ingredient_inputs(50.0);
    inputs.meal_plan.push(meal_entry(date(2026, 2, 10), "M02", None));
    inputs.bom.push(bom_line("M02", "I02", 0.3, 0.0));
    inputs.bom.push(bom_line("M02", "I01", 0.5, 10.0));
    inputs.sales_history = vec![
        sale(date(2026, 1, 13), "M02", 80.0),
        sale(date(2026, 1, 20), "M02", 90.0),
        sale(date(2026, 1, 27), "M02", 100.0),
    ];

    let planner = ReplenishmentPlanner::new(ReplenishmentConfig::default());
    let first = planner.plan(&inputs, date(2026, 2, 2));
    let second = planner.plan(&inputs, date(2026, 2, 2));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_missing_master_uses_conservative_defaults() {
    let mut inputs = single_ingredient_inputs(0.0);
    inputs.ingredient_master.clear();

    let config = ReplenishmentConfig::default()
        .with_default_lead_time(3)
        .with_default_safety_days(2);
    let report = ReplenishmentPlanner::new(config).plan(&inputs, date(2026, 2, 2));

    let line = &report.items[0];
    assert_eq!(line.category, "기타");
    assert_eq!(line.moq, 1.0);
    assert_eq!(line.packaging_unit, 1.0);
    assert_eq!(line.lead_time, 3);
    assert_eq!(line.safety_days, 2);
    assert_eq!(line.unit_price, 0.0);
    assert_eq!(line.estimated_cost, 0.0);
    assert!(line.supplier_code.is_none());
    // 1.65 × 40 × √5 ≈ 147.6 → total ≈ 357.6
    assert_eq!(line.order_qty, 358.0);
    assert_eq!(line.status, OrderStatus::Shortage);
}

#[test]
fn test_lines_sorted_by_status_priority() {
    // 毛需求 100/周,σ 20 → 安全库存 ≈57.2,总需求 ≈157.2
    let codes = [
        ("A_OVER", 500.0),
        ("B_NORMAL", 200.0),
        ("C_URGENT", 50.0),
        ("D_SHORT", 0.0),
    ];

    let mut inventory = InventorySnapshot::new();
    let mut bom = Vec::new();
    let mut masters = Vec::new();
    for (code, on_hand) in codes {
        inventory.insert(code, on_hand);
        bom.push(bom_line("M01", code, 1.0, 0.0));
        masters.push(master(code, 1.0, 1.0, 2, 1, 100.0));
    }

    let inputs = PlanningInputs {
        meal_plan: vec![meal_entry(date(2026, 2, 9), "M01", Some(100.0))],
        bom,
        ingredient_master: masters,
        inventory,
        ..PlanningInputs::default()
    };

    let report = ReplenishmentPlanner::new(ReplenishmentConfig::default())
        .plan(&inputs, date(2026, 2, 2));

    let order: Vec<(&str, OrderStatus)> = report
        .items
        .iter()
        .map(|l| (l.ingredient_code.as_str(), l.status))
        .collect();
    assert_eq!(
        order,
        vec![
            ("D_SHORT", OrderStatus::Shortage),
            ("C_URGENT", OrderStatus::Urgent),
            ("B_NORMAL", OrderStatus::Normal),
            ("A_OVER", OrderStatus::Overstock),
        ]
    );
    assert_eq!(report.urgent_items, 2);
    assert_eq!(report.shortage_items, 1);

    // 无净需求的行不下单
    assert_eq!(report.items[2].order_qty, 0.0);
    assert_eq!(report.items[3].order_qty, 0.0);
    assert_eq!(report.lines_to_order().count(), 2);
}

#[test]
fn test_higher_service_level_raises_safety_stock() {
    let inputs = single_ingredient_inputs(50.0);
    let today = date(2026, 2, 2);

    let p95 = ReplenishmentPlanner::new(ReplenishmentConfig::default()).plan(&inputs, today);
    let p99 = ReplenishmentPlanner::new(
        ReplenishmentConfig::default().with_service_level(ServiceLevel::P99),
    )
    .plan(&inputs, today);

    assert!(p99.items[0].safety_stock > p95.items[0].safety_stock);
    assert_eq!(p99.z_score, 2.33);
    assert_eq!(p99.service_level, 99.0);
}

#[test]
fn test_empty_inputs_yield_empty_report() {
    let report = ReplenishmentPlanner::new(ReplenishmentConfig::default())
        .plan(&PlanningInputs::default(), date(2026, 2, 2));

    assert_eq!(report.total_items, 0);
    assert!(report.items.is_empty());
    assert_eq!(report.total_estimated_cost, 0.0);
}

#[test]
fn test_extreme_master_lead_time_still_plans() {
    let mut inputs = single_ingredient_inputs(50.0);
    inputs.ingredient_master = vec![master("I01", 1.0, 10.0, u32::MAX, 1, 1000.0)];

    let report = ReplenishmentPlanner::new(ReplenishmentConfig::default())
        .plan(&inputs, date(2026, 2, 2));

    let line = &report.items[0];
    assert!(line.safety_stock.is_finite());
    assert!(line.order_qty > 0.0);
    assert_eq!(line.status, OrderStatus::Shortage);
}

#[test]
fn test_huge_default_lead_time_saturates_report_dates() {
    let config = ReplenishmentConfig::default().with_default_lead_time(1_000_000_000);
    let report = ReplenishmentPlanner::new(config).plan(&PlanningInputs::default(), date(2026, 2, 2));

    assert_eq!(report.total_items, 0);
    assert_eq!(report.delivery_date, chrono::NaiveDate::MAX);
    assert_eq!(report.target_period_end, chrono::NaiveDate::MAX);
}

#[test]
fn test_english_locale_status_message() {
    let config = ReplenishmentConfig::default().with_report_locale("en");
    let report = ReplenishmentPlanner::new(config).plan(&single_ingredient_inputs(50.0), date(2026, 2, 2));

    assert_eq!(
        report.items[0].status_message,
        "1.7 days of stock - urgent replenishment required"
    );
}
