// ==========================================
// 会议程序构建器 - 领域类型定义
// ==========================================
// 职责: 表类型 / ID 策略 / 标准字段集合
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 表类型 (Sheet Type)
// ==========================================
// 决定使用哪个行构建器与校验器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetType {
    #[default]
    Program,  // 日程（Session 构建器）
    Faculty,  // 讲者
    Sponsors, // 赞助商
    Custom,   // 自定义（仅保留映射字段）
}

impl SheetType {
    /// 是否走 Session 构建器
    pub fn is_program(&self) -> bool {
        matches!(self, SheetType::Program)
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetType::Program => write!(f, "program"),
            SheetType::Faculty => write!(f, "faculty"),
            SheetType::Sponsors => write!(f, "sponsors"),
            SheetType::Custom => write!(f, "custom"),
        }
    }
}

// ==========================================
// ID 生成策略 (Id Strategy)
// ==========================================
// slug-index: "{slug}-{行号}"
// uid-column: 使用唯一 ID 列的 slug，缺失时回退 slug-index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    #[default]
    SlugIndex,
    UidColumn,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::SlugIndex => write!(f, "slug-index"),
            IdStrategy::UidColumn => write!(f, "uid-column"),
        }
    }
}

// ==========================================
// 标准字段 (Canonical Fields)
// ==========================================

/// 映射后始终存在的默认目标字段（顺序即输出顺序）
pub const DEFAULT_TARGET_FIELDS: [&str; 13] = [
    "time",
    "title",
    "speaker",
    "chair",
    "track",
    "type",
    "room",
    "notes",
    "sponsor",
    "sponsor_name",
    "sponsored_by",
    "sponsor_id",
    "sponsor_logo",
];

/// 判定 Session 行是否为空行时检查的字段
pub const SESSION_CONTENT_FIELDS: [&str; 10] = [
    "time",
    "title",
    "speaker",
    "chair",
    "track",
    "type",
    "room",
    "notes",
    "sponsor",
    "sponsor_logo",
];

/// 赞助商记录中视为 logo 的字段（按优先级）
pub const LOGO_KEYS: [&str; 3] = ["logo", "logo_url", "image"];

/// 是否为 Session 固定字段（含 id）
pub fn is_session_field(field: &str) -> bool {
    field == "id" || DEFAULT_TARGET_FIELDS.contains(&field)
}
