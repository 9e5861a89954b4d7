// ==========================================
// 餐饮运营补货计划系统 - 需求预测引擎
// ==========================================
// 职责: 历史销售 → (菜单, 星期) 维度均值/标准差
// 红线: 总体标准差（除以 n）; 无样本的分组不生成记录
// ==========================================

use crate::domain::meal::{DayOfWeekStatistic, SalesHistoryRecord};
use crate::engine::math::round_to;
use chrono::Weekday;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

// ==========================================
// DemandForecaster - 需求预测引擎
// ==========================================
pub struct DemandForecaster;

impl DemandForecaster {
    pub fn new() -> Self {
        Self
    }

    /// 计算星期维度销售统计
    ///
    /// 分组键 = (menu_code 或 menu_name, weekday); 输出按分组键有序
    #[instrument(skip(self, history), fields(records = history.len()))]
    pub fn compute_statistics(&self, history: &[SalesHistoryRecord]) -> Vec<DayOfWeekStatistic> {
        let mut groups: BTreeMap<(String, u32), Vec<&SalesHistoryRecord>> = BTreeMap::new();
        for record in history {
            let key = record.menu_key();
            if key.is_empty() {
                continue;
            }
            groups
                .entry((key, record.weekday.num_days_from_monday()))
                .or_default()
                .push(record);
        }

        let stats: Vec<DayOfWeekStatistic> = groups
            .into_values()
            .filter_map(|records| Self::summarize(&records))
            .collect();

        debug!(groups = stats.len(), "星期维度统计完成");
        stats
    }

    /// 单分组汇总（空分组返回 None）
    fn summarize(records: &[&SalesHistoryRecord]) -> Option<DayOfWeekStatistic> {
        let first = records.first()?;
        let n = records.len() as f64;

        let sum: f64 = records.iter().map(|r| r.sold_qty).sum();
        let mean = sum / n;
        let variance = records
            .iter()
            .map(|r| (r.sold_qty - mean).powi(2))
            .sum::<f64>()
            / n;

        let max_sales = records
            .iter()
            .map(|r| r.sold_qty)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_sales = records
            .iter()
            .map(|r| r.sold_qty)
            .fold(f64::INFINITY, f64::min);

        Some(DayOfWeekStatistic {
            weekday: first.weekday,
            menu_code: first.menu_code.clone(),
            menu_name: first.menu_name.clone(),
            avg_sales: round_to(mean, 1),
            std_dev: round_to(variance.sqrt(), 1),
            max_sales,
            min_sales,
            sample_count: records.len(),
        })
    }
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// ForecastIndex - 统计查询索引
// ==========================================
/// (menu_key, weekday) → 统计; 未命中即调用方走回退逻辑
pub struct ForecastIndex<'a> {
    index: HashMap<(String, Weekday), &'a DayOfWeekStatistic>,
}

impl<'a> ForecastIndex<'a> {
    pub fn new(stats: &'a [DayOfWeekStatistic]) -> Self {
        let mut index = HashMap::with_capacity(stats.len());
        for stat in stats {
            index.entry((stat.menu_key(), stat.weekday)).or_insert(stat);
        }
        Self { index }
    }

    pub fn get(&self, menu_key: &str, weekday: Weekday) -> Option<&'a DayOfWeekStatistic> {
        self.index.get(&(menu_key.to_string(), weekday)).copied()
    }
}
