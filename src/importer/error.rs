// ==========================================
// 采购预测分析引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 导入失败直接上抛给调用方（与分析器的“不抛错”约定不同）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (expected .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse Excel file: {0}")]
    ExcelParseError(String),

    #[error("Failed to parse CSV file: {0}")]
    CsvParseError(String),

    // ===== 数据映射错误 =====
    #[error("Required field missing (row {row}): {field}")]
    RequiredFieldMissing { row: usize, field: String },

    #[error("Type conversion failed (row {row}, field {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
