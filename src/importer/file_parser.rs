// ==========================================
// 餐饮运营补货计划系统 - 表格文件解析
// ==========================================
// 支持: CSV 导出目录 / Excel 工作簿 (.xlsx/.xls)
// 输出: 每行 HashMap<列名, 值>,空白行跳过
// ==========================================

use crate::importer::error::{SourceError, SourceResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// 原始行记录
pub type RawRow = HashMap<String, String>;

// ==========================================
// Dataset - 表格数据集
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    MealPlan,
    SalesHistory,
    Bom,
    IngredientMaster,
}

impl Dataset {
    /// 标准名称（CSV 文件名 / 工作表名）
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::MealPlan => "meal_plan",
            Dataset::SalesHistory => "sales_history",
            Dataset::Bom => "bom",
            Dataset::IngredientMaster => "ingredient_master",
        }
    }

    /// 工作表别名
    pub fn sheet_aliases(&self) -> &'static [&'static str] {
        match self {
            Dataset::MealPlan => &["meal_plan", "식단표", "식단"],
            Dataset::SalesHistory => &["sales_history", "판매실적", "판매이력"],
            Dataset::Bom => &["bom", "BOM", "레시피"],
            Dataset::IngredientMaster => &["ingredient_master", "식자재마스터", "식자재"],
        }
    }
}

// ==========================================
// SheetReader Trait
// ==========================================
pub trait SheetReader: Send + Sync {
    fn read_rows(&self, dataset: Dataset) -> SourceResult<Vec<RawRow>>;
}

// ==========================================
// CSV 目录实现
// ==========================================
/// 目录下每个数据集一个 CSV 文件（如 meal_plan.csv）
pub struct CsvDirectoryReader {
    dir: PathBuf,
}

impl CsvDirectoryReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn locate(&self, dataset: Dataset) -> Option<PathBuf> {
        dataset
            .sheet_aliases()
            .iter()
            .map(|alias| self.dir.join(format!("{}.csv", alias)))
            .find(|path| path.exists())
    }
}

impl SheetReader for CsvDirectoryReader {
    fn read_rows(&self, dataset: Dataset) -> SourceResult<Vec<RawRow>> {
        let path = self.locate(dataset).ok_or_else(|| {
            SourceError::SourceNotFound(self.dir.join(format!("{}.csv", dataset.name())).display().to_string())
        })?;
        parse_csv_file(&path)
    }
}

/// 解析单个 CSV 文件
pub fn parse_csv_file(path: &Path) -> SourceResult<Vec<RawRow>> {
    if !path.exists() {
        return Err(SourceError::SourceNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    // 读取表头（去除 UTF-8 BOM）
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok(records)
}

// ==========================================
// Excel 工作簿实现
// ==========================================
pub struct ExcelWorkbookReader {
    path: PathBuf,
}

impl ExcelWorkbookReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetReader for ExcelWorkbookReader {
    fn read_rows(&self, dataset: Dataset) -> SourceResult<Vec<RawRow>> {
        if !self.path.exists() {
            return Err(SourceError::SourceNotFound(self.path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        let sheet_name = dataset
            .sheet_aliases()
            .iter()
            .find_map(|alias| sheet_names.iter().find(|name| name.trim() == *alias))
            .cloned()
            .ok_or_else(|| SourceError::SheetNotFound(dataset.name().to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Ok(Vec::new()),
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

/// 根据来源标识选择解析器: 目录 → CSV,.xlsx/.xls → Excel
pub fn reader_for(source: &Path) -> SourceResult<Box<dyn SheetReader>> {
    if source.is_dir() {
        return Ok(Box::new(CsvDirectoryReader::new(source)));
    }

    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => Ok(Box::new(ExcelWorkbookReader::new(source))),
        _ if !source.exists() => Err(SourceError::SourceNotFound(source.display().to_string())),
        _ => Err(SourceError::UnsupportedFormat(ext)),
    }
}
