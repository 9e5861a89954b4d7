// ==========================================
// 餐饮运营补货计划系统 - 补货建议 API
// ==========================================
// 职责: 六类输入并发取数 → 降级处理 → 计划运行 → 可选落库
// 红线:
// - 取数失败降级为空集合并告警,不中止报告
// - 计划运行使用调用方传入的不可变配置
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReplenishmentConfig;
use crate::domain::recommendation::OrderRecommendation;
use crate::domain::types::shift_days;
use crate::engine::planner::{PlanningInputs, ReplenishmentPlanner};
use crate::importer::data_source::{ErpDataSource, SheetDataSource};
use crate::importer::error::SourceResult;
use crate::repository::recommendation_repo::RecommendationRepository;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// SourceStatus - 单个数据源的取数结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    Loaded(usize),
    Empty,
    Failed(String),
}

impl SourceStatus {
    fn from_count(count: usize) -> Self {
        if count == 0 {
            SourceStatus::Empty
        } else {
            SourceStatus::Loaded(count)
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SourceStatus::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SourceStatus::Failed(_))
    }
}

// ==========================================
// SourceCoverage - 六类输入覆盖情况
// ==========================================
/// 用于区分"无需补货"与"数据管道故障"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCoverage {
    pub meal_plan: SourceStatus,
    pub sales_history: SourceStatus,
    pub bom: SourceStatus,
    pub ingredient_master: SourceStatus,
    pub inventory: SourceStatus,
    pub in_transit: SourceStatus,
}

impl SourceCoverage {
    fn statuses(&self) -> [&SourceStatus; 6] {
        [
            &self.meal_plan,
            &self.sales_history,
            &self.bom,
            &self.ingredient_master,
            &self.inventory,
            &self.in_transit,
        ]
    }

    /// 六类输入全部为空（含失败）
    pub fn all_empty(&self) -> bool {
        self.statuses().iter().all(|s| !s.is_loaded())
    }

    pub fn any_failed(&self) -> bool {
        self.statuses().iter().any(|s| s.is_failed())
    }
}

// ==========================================
// PlanningOutcome - 计划运行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningOutcome {
    pub recommendation: OrderRecommendation,
    pub coverage: SourceCoverage,
}

// ==========================================
// PlanningWindow - 取数窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanningWindow {
    pub meal_plan_start: NaiveDate,
    pub meal_plan_end: NaiveDate,
    pub forecast_weeks: u32,
}

impl PlanningWindow {
    /// 食单窗口: [today + lead, today + lead + 7]
    pub fn for_config(config: &ReplenishmentConfig, today: NaiveDate) -> Self {
        let start = shift_days(today, i64::from(config.default_lead_time_days));
        Self {
            meal_plan_start: start,
            meal_plan_end: shift_days(start, 7),
            forecast_weeks: config.forecast_weeks,
        }
    }
}

/// 取数结果降级: 失败 → 默认空集合 + 告警
fn degrade<T: Default>(
    dataset: &str,
    result: SourceResult<T>,
    count: impl Fn(&T) -> usize,
) -> (T, SourceStatus) {
    match result {
        Ok(value) => {
            let status = SourceStatus::from_count(count(&value));
            (value, status)
        }
        Err(e) => {
            warn!(dataset, error = %e, "数据源取数失败,按空集合处理");
            (T::default(), SourceStatus::Failed(e.to_string()))
        }
    }
}

// ==========================================
// ReplenishmentApi - 补货建议 API
// ==========================================
pub struct ReplenishmentApi<S, E>
where
    S: SheetDataSource,
    E: ErpDataSource,
{
    sheets: Arc<S>,
    erp: Arc<E>,
    report_repo: Option<Arc<RecommendationRepository>>,
}

impl<S, E> ReplenishmentApi<S, E>
where
    S: SheetDataSource,
    E: ErpDataSource,
{
    pub fn new(sheets: Arc<S>, erp: Arc<E>) -> Self {
        Self {
            sheets,
            erp,
            report_repo: None,
        }
    }

    pub fn with_report_repo(mut self, repo: Arc<RecommendationRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    /// 并发获取六类输入（fan-out / fan-in）
    #[instrument(skip(self, config))]
    pub async fn fetch_inputs(
        &self,
        config: &ReplenishmentConfig,
        today: NaiveDate,
    ) -> (PlanningInputs, SourceCoverage) {
        let window = PlanningWindow::for_config(config, today);

        let (meal_plan, sales_history, bom, ingredient_master, inventory, in_transit) = futures::join!(
            self.sheets
                .fetch_meal_plan(window.meal_plan_start, window.meal_plan_end),
            self.sheets.fetch_sales_history(window.forecast_weeks, today),
            self.sheets.fetch_bom(),
            self.sheets.fetch_ingredient_master(),
            self.erp.fetch_current_inventory(),
            self.erp.fetch_in_transit(),
        );

        let (meal_plan, meal_plan_status) = degrade("meal_plan", meal_plan, Vec::len);
        let (sales_history, sales_status) = degrade("sales_history", sales_history, Vec::len);
        let (bom, bom_status) = degrade("bom", bom, Vec::len);
        let (ingredient_master, master_status) =
            degrade("ingredient_master", ingredient_master, Vec::len);
        let (inventory, inventory_status) = degrade("inventory", inventory, |v| v.len());
        let (in_transit, in_transit_status) = degrade("in_transit", in_transit, |v| v.len());

        let inputs = PlanningInputs {
            meal_plan,
            sales_history,
            bom,
            ingredient_master,
            inventory,
            in_transit,
        };
        let coverage = SourceCoverage {
            meal_plan: meal_plan_status,
            sales_history: sales_status,
            bom: bom_status,
            ingredient_master: master_status,
            inventory: inventory_status,
            in_transit: in_transit_status,
        };

        (inputs, coverage)
    }

    /// 生成补货建议（不落库）
    #[instrument(skip(self, config), fields(service_level = %config.service_level))]
    pub async fn generate_recommendation(
        &self,
        config: &ReplenishmentConfig,
        today: NaiveDate,
    ) -> PlanningOutcome {
        let (inputs, coverage) = self.fetch_inputs(config, today).await;

        if coverage.all_empty() {
            warn!("六类输入全部为空,请检查数据管道");
        }

        let recommendation = ReplenishmentPlanner::new(config.clone()).plan(&inputs, today);

        info!(
            total_items = recommendation.total_items,
            urgent_items = recommendation.urgent_items,
            any_source_failed = coverage.any_failed(),
            "补货建议生成完成"
        );

        PlanningOutcome {
            recommendation,
            coverage,
        }
    }

    /// 生成补货建议并保存报告快照
    ///
    /// 未配置报告仓储时只生成不保存（report_id 为 None）
    pub async fn generate_and_save(
        &self,
        config: &ReplenishmentConfig,
        today: NaiveDate,
    ) -> ApiResult<(PlanningOutcome, Option<String>)> {
        let outcome = self.generate_recommendation(config, today).await;
        let report_id = match &self.report_repo {
            Some(repo) => Some(repo.save(&outcome.recommendation)?),
            None => None,
        };
        Ok((outcome, report_id))
    }

    /// 读取已保存的报告
    pub fn load_report(&self, report_id: &str) -> ApiResult<OrderRecommendation> {
        let repo = self
            .report_repo
            .as_ref()
            .ok_or_else(|| ApiError::InternalError("未配置报告仓储".to_string()))?;
        repo.find_by_id(report_id)?
            .ok_or_else(|| ApiError::NotFound(format!("报告(id={})不存在", report_id)))
    }
}
