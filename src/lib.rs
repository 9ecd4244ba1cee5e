// ==========================================
// 会议程序构建器 - 核心库
// ==========================================
// 流程: 工作簿 → 列猜测/映射 → 行构建 → 赞助商补全 → 校验 → JSON
// 系统定位: 会议日程前端的数据准备工具
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格 / 工作簿 / 输出记录
pub mod domain;

// 导入层 - 文件解析、来源、清洗、映射
pub mod importer;

// 配置层 - 构建配置与运行参数
pub mod config;

// 引擎层 - 行构建、补全、校验、编排
pub mod engine;

// API 层 - 工作簿会话
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IdStrategy, SheetType};

// 领域实体
pub use domain::{
    CellValue, GenericItem, OutputGroup, PreviewResponse, ProgramData, RawTable, SessionRecord,
    SheetSummary, Speakers, Workbook,
};

// 配置
pub use config::{AppSettings, BuildConfig, SheetConfig, SheetOptions};

// 引擎
pub use engine::{BuildOutcome, ProgramPipeline, SponsorDetection, SponsorEnricher};

// API
pub use api::{ApiError, ApiResult, BuildReport, WorkbookSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "program-builder";
