// ==========================================
// ReplenishmentApi 集成测试
// ==========================================
// 测试目标: 并发取数、失败降级、覆盖情况、报告落库
// ==========================================


use async_trait::async_trait;
use chrono::NaiveDate;
use meal_ops_planner::api::{ApiError, ReplenishmentApi, SourceStatus};
use meal_ops_planner::config::ReplenishmentConfig;
use meal_ops_planner::domain::{
    BomLine, IngredientMaster, InTransitQuantity, InventorySnapshot, MealPlanEntry, OrderStatus,
    SalesHistoryRecord,
};
use meal_ops_planner::importer::{ErpDataSource, SheetDataSource, SourceError, SourceResult};
use meal_ops_planner::logging;
use meal_ops_planner::repository::RecommendationRepository;
use std::sync::{Arc, Mutex};
use test_helpers::{bom_line, create_test_db, date, master, meal_entry, open_test_connection};

// ==========================================
// Mock 数据源
// ==========================================

#[derive(Default)]
struct MockSheets {
    meal_plan: Vec<MealPlanEntry>,
    bom: Vec<BomLine>,
    masters: Vec<IngredientMaster>,
    fail_sales: bool,
    fail_all: bool,
    requested_window: Mutex<Option<(NaiveDate, NaiveDate)>>,
    requested_weeks: Mutex<Option<u32>>,
}

impl MockSheets {
    fn failure(&self, dataset: &str) -> SourceResult<()> {
        if self.fail_all {
            return Err(SourceError::SourceNotFound(dataset.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetDataSource for MockSheets {
    async fn fetch_meal_plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceResult<Vec<MealPlanEntry>> {
        self.failure("meal_plan")?;
        *self.requested_window.lock().unwrap() = Some((start, end));
        Ok(self.meal_plan.clone())
    }

    async fn fetch_sales_history(
        &self,
        weeks: u32,
        _today: NaiveDate,
    ) -> SourceResult<Vec<SalesHistoryRecord>> {
        self.failure("sales_history")?;
        *self.requested_weeks.lock().unwrap() = Some(weeks);
        if self.fail_sales {
            return Err(SourceError::FileReadError("sales export locked".to_string()));
        }
        Ok(Vec::new())
    }

    async fn fetch_bom(&self) -> SourceResult<Vec<BomLine>> {
        self.failure("bom")?;
        Ok(self.bom.clone())
    }

    async fn fetch_ingredient_master(&self) -> SourceResult<Vec<IngredientMaster>> {
        self.failure("ingredient_master")?;
        Ok(self.masters.clone())
    }
}

#[derive(Default)]
struct MockErp {
    inventory: InventorySnapshot,
    fail: bool,
}

#[async_trait]
impl ErpDataSource for MockErp {
    async fn fetch_current_inventory(&self) -> SourceResult<InventorySnapshot> {
        if self.fail {
            return Err(SourceError::ErpQueryError("connection refused".to_string()));
        }
        Ok(self.inventory.clone())
    }

    async fn fetch_in_transit(&self) -> SourceResult<InTransitQuantity> {
        if self.fail {
            return Err(SourceError::ErpQueryError("connection refused".to_string()));
        }
        Ok(InTransitQuantity::new())
    }
}

fn scenario_sheets() -> MockSheets {
    MockSheets {
        meal_plan: vec![meal_entry(date(2026, 2, 9), "M01", Some(100.0))],
        bom: vec![bom_line("M01", "I01", 2.0, 5.0)],
        masters: vec![master("I01", 1.0, 10.0, 2, 1, 1000.0)],
        ..MockSheets::default()
    }
}

fn scenario_erp() -> MockErp {
    let mut inventory = InventorySnapshot::new();
    inventory.insert("I01", 50.0);
    MockErp {
        inventory,
        fail: false,
    }
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_generate_recommendation_with_all_sources() {
    logging::init_test();
    let sheets = Arc::new(scenario_sheets());
    let api = ReplenishmentApi::new(sheets.clone(), Arc::new(scenario_erp()));
    let config = ReplenishmentConfig::default().with_forecast_weeks(6);

    let outcome = api.generate_recommendation(&config, date(2026, 2, 2)).await;

    assert_eq!(outcome.coverage.meal_plan, SourceStatus::Loaded(1));
    assert_eq!(outcome.coverage.sales_history, SourceStatus::Empty);
    assert_eq!(outcome.coverage.inventory, SourceStatus::Loaded(1));
    assert_eq!(outcome.coverage.in_transit, SourceStatus::Empty);
    assert!(!outcome.coverage.any_failed());

    // 食单窗口: [today + 2, today + 9]
    assert_eq!(
        *sheets.requested_window.lock().unwrap(),
        Some((date(2026, 2, 4), date(2026, 2, 11)))
    );
    assert_eq!(*sheets.requested_weeks.lock().unwrap(), Some(6));

    let line = &outcome.recommendation.items[0];
    assert_eq!(line.order_qty, 280.0);
    assert_eq!(line.status, OrderStatus::Shortage);
}

#[tokio::test]
async fn test_failed_source_degrades_to_empty() {
    logging::init_test();
    let sheets = MockSheets {
        fail_sales: true,
        ..scenario_sheets()
    };
    let erp = MockErp {
        fail: true,
        ..MockErp::default()
    };
    let api = ReplenishmentApi::new(Arc::new(sheets), Arc::new(erp));

    let outcome = api
        .generate_recommendation(&ReplenishmentConfig::default(), date(2026, 2, 2))
        .await;

    assert!(outcome.coverage.sales_history.is_failed());
    assert!(outcome.coverage.inventory.is_failed());
    assert!(outcome.coverage.in_transit.is_failed());
    assert!(outcome.coverage.any_failed());
    assert!(!outcome.coverage.all_empty());

    // 库存取数失败按 0 处理,计划仍然完成
    let line = &outcome.recommendation.items[0];
    assert_eq!(line.current_stock, 0.0);
    assert_eq!(line.available_stock, 0.0);
    assert_eq!(line.order_qty, 330.0);
}

#[tokio::test]
async fn test_all_sources_failing_yields_empty_report() {
    let sheets = MockSheets {
        fail_all: true,
        ..MockSheets::default()
    };
    let erp = MockErp {
        fail: true,
        ..MockErp::default()
    };
    let api = ReplenishmentApi::new(Arc::new(sheets), Arc::new(erp));

    let outcome = api
        .generate_recommendation(&ReplenishmentConfig::default(), date(2026, 2, 2))
        .await;

    assert!(outcome.coverage.all_empty());
    assert_eq!(outcome.recommendation.total_items, 0);
    assert!(outcome.recommendation.items.is_empty());
}

#[tokio::test]
async fn test_generate_and_save_persists_report() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    let repo = Arc::new(RecommendationRepository::from_connection(conn));

    let api = ReplenishmentApi::new(Arc::new(scenario_sheets()), Arc::new(scenario_erp()))
        .with_report_repo(repo.clone());

    let (outcome, report_id) = api
        .generate_and_save(&ReplenishmentConfig::default(), date(2026, 2, 2))
        .await
        .unwrap();
    let report_id = report_id.expect("配置仓储后应返回 report_id");

    let loaded = api.load_report(&report_id).unwrap();
    assert_eq!(loaded, outcome.recommendation);

    let missing = api.load_report("no-such-report");
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_generate_and_save_without_repository() {
    let api = ReplenishmentApi::new(Arc::new(scenario_sheets()), Arc::new(scenario_erp()));

    let (_, report_id) = api
        .generate_and_save(&ReplenishmentConfig::default(), date(2026, 2, 2))
        .await
        .unwrap();
    assert!(report_id.is_none());
}
