// ==========================================
// 会议程序构建器 - 流水线错误类型
// ==========================================
// 范围: 请求级错误（配置引用了不存在的表、选项正则非法、产物序列化失败）
// 说明: 行级问题不是错误，见 ValidationReport
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Sheet '{sheet}' not found in workbook")]
    SheetNotFound { sheet: String },

    #[error("Invalid chair prefix pattern for sheet '{sheet}': {pattern} ({message})")]
    InvalidPattern {
        sheet: String,
        pattern: String,
        message: String,
    },

    #[error("Failed to serialize program data: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
