// ==========================================
// 会议程序构建器 - 领域层
// ==========================================
// 职责: 原始表、输出记录与核心枚举
// ==========================================

pub mod record;
pub mod types;
pub mod workbook;

// 重导出核心类型
pub use record::{
    GenericItem, GroupRecords, OutputGroup, PreviewResponse, ProgramData, SessionRecord,
    SheetSummary, Speakers,
};
pub use types::{IdStrategy, SheetType, DEFAULT_TARGET_FIELDS, LOGO_KEYS, SESSION_CONTENT_FIELDS};
pub use workbook::{CellValue, RawTable, Workbook};
