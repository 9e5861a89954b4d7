// ==========================================
// 餐饮运营补货计划系统 - 数据源 Trait
// ==========================================
// 职责: 定义六类输入的取数接口（不包含实现）
// 实现者:
// - SheetDataSource: FileSheetSource（表格导出）
// - ErpDataSource: ErpInventoryRepository（SQLite ERP 库）
// 红线: 取数失败返回 Err,由调用方降级为空集合
// ==========================================

use crate::domain::bom::BomLine;
use crate::domain::ingredient::IngredientMaster;
use crate::domain::inventory::{InTransitQuantity, InventorySnapshot};
use crate::domain::meal::{MealPlanEntry, SalesHistoryRecord};
use crate::domain::types::shift_days;
use crate::importer::error::SourceResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// SheetDataSource Trait
// ==========================================
// 用途: 表格类数据（食单、销售、BOM、主数据）
#[async_trait]
pub trait SheetDataSource: Send + Sync {
    /// 获取 [start, end] 区间内的食单
    async fn fetch_meal_plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceResult<Vec<MealPlanEntry>>;

    /// 获取截至 today 前一天的 N 周销售记录
    async fn fetch_sales_history(
        &self,
        weeks: u32,
        today: NaiveDate,
    ) -> SourceResult<Vec<SalesHistoryRecord>>;

    /// 获取 BOM（不按日期过滤）
    async fn fetch_bom(&self) -> SourceResult<Vec<BomLine>>;

    /// 获取食材主数据（不按日期过滤）
    async fn fetch_ingredient_master(&self) -> SourceResult<Vec<IngredientMaster>>;
}

// ==========================================
// ErpDataSource Trait
// ==========================================
// 用途: 库存类数据（现有库存、在途）
#[async_trait]
pub trait ErpDataSource: Send + Sync {
    /// 当前库存（跨仓汇总）
    async fn fetch_current_inventory(&self) -> SourceResult<InventorySnapshot>;

    /// 未到货采购数量
    async fn fetch_in_transit(&self) -> SourceResult<InTransitQuantity>;
}

// ==========================================
// 日期窗口
// ==========================================

/// 销售回看窗口: [today - 7×weeks, today - 1]
pub fn sales_window(weeks: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = shift_days(today, -7 * i64::from(weeks));
    let end = shift_days(today, -1);
    (start, end)
}

/// 是否落在闭区间内
pub fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_window_four_weeks() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let (start, end) = sales_window(4, today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert!(within(start, start, end));
        assert!(!within(today, start, end));
    }

    #[test]
    fn test_sales_window_with_huge_week_count_saturates() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let (start, end) = sales_window(1_000_000_000, today);
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }
}
