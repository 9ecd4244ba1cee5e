// ==========================================
// 会议程序构建器 - 运行参数
// ==========================================
// 来源: 环境变量，缺失或格式错误时回退默认值
// ==========================================

use std::time::Duration;

pub mod settings_keys {
    // Google Sheets 下载超时（秒）
    pub const FETCH_TIMEOUT_SECS: &str = "PROGRAM_BUILDER_FETCH_TIMEOUT_SECS";
    // 构建产物文件名
    pub const OUTPUT_FILE: &str = "PROGRAM_BUILDER_OUTPUT_FILE";
}

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_OUTPUT_FILE: &str = "program.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub fetch_timeout: Duration,
    pub output_file: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl AppSettings {
    /// 从进程环境读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于测试）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(settings_keys::FETCH_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.fetch_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    config_key = settings_keys::FETCH_TIMEOUT_SECS,
                    raw_value = %raw,
                    "超时配置格式错误，使用默认值"
                ),
            }
        }

        if let Some(raw) = lookup(settings_keys::OUTPUT_FILE) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                tracing::warn!(config_key = settings_keys::OUTPUT_FILE, "输出文件名为空，使用默认值");
            } else {
                settings.output_file = trimmed.to_string();
            }
        }

        settings
    }
}
