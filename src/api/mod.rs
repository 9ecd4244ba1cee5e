// ==========================================
// 会议程序构建器 - API 层
// ==========================================
// 职责: 工作簿会话（加载 / 预览 / 构建 / 重置），供命令行调用
// ==========================================

pub mod error;
pub mod program_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use program_api::{summarize, write_artifact, BuildReport, WorkbookSession};
