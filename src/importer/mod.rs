// ==========================================
// 餐饮运营补货计划系统 - 导入层
// ==========================================
// 职责: 外部数据取数（表格数据源、ERP 数据源）
// 支持: CSV 目录、Excel 工作簿、SQLite ERP 库
// ==========================================

pub mod data_source;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod sheet_source;

// 重导出核心类型
pub use error::{SourceError, SourceResult};
pub use field_mapper::SheetFieldMapper;
pub use file_parser::{CsvDirectoryReader, Dataset, ExcelWorkbookReader, SheetReader};
pub use sheet_source::FileSheetSource;

// 重导出 Trait 接口
pub use data_source::{ErpDataSource, SheetDataSource};
