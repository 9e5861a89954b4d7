// ==========================================
// 餐饮运营补货计划系统 - 数据源错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 数据源错误不会中止计划运行,由 API 层降级为空集合
// ==========================================

use thiserror::Error;

/// 数据源错误类型
#[derive(Error, Debug)]
pub enum SourceError {
    // ===== 文件相关错误 =====
    #[error("数据源不存在: {0}")]
    SourceNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv 或 CSV 目录）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    // ===== ERP 相关错误 =====
    #[error("ERP 查询失败: {0}")]
    ErpQueryError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for SourceError {
    fn from(err: calamine::Error) -> Self {
        SourceError::ExcelParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for SourceError {
    fn from(err: calamine::XlsxError) -> Self {
        SourceError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type SourceResult<T> = Result<T, SourceError>;
