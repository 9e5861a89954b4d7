// ==========================================
// 餐饮运营补货计划系统 - 表格数据源实现
// ==========================================
// 来源: CSV 导出目录 或 Excel 工作簿（source_sheet_id 即路径）
// 流程: 读取原始行 → 字段映射 → 日期区间过滤
// ==========================================

use crate::domain::bom::BomLine;
use crate::domain::ingredient::{IngredientDefaults, IngredientMaster};
use crate::domain::meal::{MealPlanEntry, SalesHistoryRecord};
use crate::importer::data_source::{sales_window, within, SheetDataSource};
use crate::importer::error::SourceResult;
use crate::importer::field_mapper::SheetFieldMapper;
use crate::importer::file_parser::{reader_for, Dataset, SheetReader};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, instrument};

// ==========================================
// FileSheetSource - 表格文件数据源
// ==========================================
pub struct FileSheetSource {
    source_id: String,
    reader: Box<dyn SheetReader>,
    mapper: SheetFieldMapper,
}

impl FileSheetSource {
    /// 按来源标识打开数据源
    ///
    /// # 参数
    /// - source_id: CSV 目录或 .xlsx/.xls 文件路径
    /// - defaults: 主数据空字段的默认参数
    pub fn open(source_id: &str, defaults: IngredientDefaults) -> SourceResult<Self> {
        let reader = reader_for(Path::new(source_id))?;
        Ok(Self::with_reader(source_id, reader, defaults))
    }

    /// 使用自定义解析器创建
    pub fn with_reader(
        source_id: &str,
        reader: Box<dyn SheetReader>,
        defaults: IngredientDefaults,
    ) -> Self {
        Self {
            source_id: source_id.to_string(),
            reader,
            mapper: SheetFieldMapper::new(defaults),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

#[async_trait]
impl SheetDataSource for FileSheetSource {
    #[instrument(skip(self), fields(source = %self.source_id))]
    async fn fetch_meal_plan(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceResult<Vec<MealPlanEntry>> {
        let rows = self.reader.read_rows(Dataset::MealPlan)?;
        let entries: Vec<MealPlanEntry> = self
            .mapper
            .map_meal_plan(&rows)
            .into_iter()
            .filter(|e| within(e.date, start, end))
            .collect();
        debug!(rows = rows.len(), entries = entries.len(), "食单读取完成");
        Ok(entries)
    }

    #[instrument(skip(self), fields(source = %self.source_id))]
    async fn fetch_sales_history(
        &self,
        weeks: u32,
        today: NaiveDate,
    ) -> SourceResult<Vec<SalesHistoryRecord>> {
        let (start, end) = sales_window(weeks, today);
        let rows = self.reader.read_rows(Dataset::SalesHistory)?;
        let records: Vec<SalesHistoryRecord> = self
            .mapper
            .map_sales_history(&rows)
            .into_iter()
            .filter(|r| within(r.date, start, end))
            .collect();
        debug!(rows = rows.len(), records = records.len(), %start, %end, "销售记录读取完成");
        Ok(records)
    }

    async fn fetch_bom(&self) -> SourceResult<Vec<BomLine>> {
        let rows = self.reader.read_rows(Dataset::Bom)?;
        Ok(self.mapper.map_bom(&rows))
    }

    async fn fetch_ingredient_master(&self) -> SourceResult<Vec<IngredientMaster>> {
        let rows = self.reader.read_rows(Dataset::IngredientMaster)?;
        Ok(self.mapper.map_ingredient_master(&rows))
    }
}
