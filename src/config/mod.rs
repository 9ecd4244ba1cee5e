// ==========================================
// 会议程序构建器 - 配置层
// ==========================================
// 职责: 请求级构建配置 + 进程级运行参数
// ==========================================

pub mod build_config;
pub mod settings;

pub use build_config::{
    BuildConfig, CompiledOptions, SheetConfig, SheetOptions, DEFAULT_CHAIR_PREFIX_REGEX,
};
pub use settings::{settings_keys, AppSettings};

use thiserror::Error;

/// 配置读取错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid build config: {0}")]
    Parse(#[from] serde_json::Error),
}
