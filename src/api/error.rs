// ==========================================
// 会议程序构建器 - API 层错误类型
// ==========================================
// 职责: 请求级错误（立即返回，区别于行级 warnings/errors）
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::PipelineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("No file provided. Upload a file or fetch from Google Sheets.")]
    NoWorkbook,

    #[error("Sheet '{sheet}' not found in workbook")]
    SheetNotFound { sheet: String },

    #[error("Invalid chair prefix pattern for sheet '{sheet}': {pattern} ({message})")]
    InvalidPattern {
        sheet: String,
        pattern: String,
        message: String,
    },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ==========================================
    // 产物错误
    // ==========================================
    #[error("Failed to write output {path}: {message}")]
    OutputWrite { path: String, message: String },

    #[error("Failed to serialize output: {0}")]
    Serialization(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 PipelineError 转换
// ==========================================
impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::SheetNotFound { sheet } => ApiError::SheetNotFound { sheet },
            PipelineError::InvalidPattern {
                sheet,
                pattern,
                message,
            } => ApiError::InvalidPattern {
                sheet,
                pattern,
                message,
            },
            PipelineError::Serialization(e) => ApiError::Serialization(e.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
