// ==========================================
// 会议程序构建器 - 列名猜测
// ==========================================
// 职责: 表头 → 标准字段的建议映射（中英西常见表头别名）
// 说明: 仅作建议，最终映射由人工确认
// ==========================================

use indexmap::IndexMap;
use std::collections::HashMap;

/// 标准字段 → 候选表头（按优先级）
pub const CANDIDATES: [(&str, &[&str]); 13] = [
    (
        "time",
        &["hora", "horario", "time", "schedule", "start", "start time", "inicio"],
    ),
    (
        "title",
        &["tema", "título", "titulo", "title", "subject", "session", "topic"],
    ),
    (
        "speaker",
        &["ponente", "speaker", "presenter", "author", "speakers"],
    ),
    ("chair", &["chair", "moderator", "chairperson", "moderador"]),
    ("track", &["track", "room", "salon", "salón", "track/room"]),
    ("type", &["type", "session type", "category", "categoría"]),
    ("room", &["room", "salon", "salón"]),
    (
        "notes",
        &["notes", "note", "remarks", "comentarios", "notas"],
    ),
    (
        "sponsor",
        &[
            "sponsor",
            "patrocinador",
            "sponsored by",
            "sponsored_by",
            "sponsor name",
            "sponsor_name",
        ],
    ),
    (
        "sponsor_name",
        &["sponsor name", "sponsor_name", "patrocinador"],
    ),
    (
        "sponsored_by",
        &["sponsored by", "sponsored_by", "patrocinador"],
    ),
    (
        "sponsor_id",
        &[
            "sponsor id",
            "sponsor_id",
            "id patrocinador",
            "id sponsor",
            "sponsor code",
            "sponsor_code",
        ],
    ),
    (
        "sponsor_logo",
        &[
            "sponsor logo",
            "sponsor_logo",
            "logo sponsor",
            "logo patrocinador",
            "logo",
        ],
    ),
];

pub struct ColumnGuesser;

impl ColumnGuesser {
    /// 猜测映射
    ///
    /// # 参数
    /// - columns: 原始表头（保留原始大小写用于输出）
    ///
    /// # 返回
    /// - 标准字段 → 原始列名；无匹配的字段不出现
    pub fn guess<S: AsRef<str>>(columns: &[S]) -> IndexMap<String, String> {
        // 小写 trim 后的列名 → 原始列名（同名后者覆盖前者）
        let lower_cols: HashMap<String, &str> = columns
            .iter()
            .map(|c| (c.as_ref().trim().to_lowercase(), c.as_ref()))
            .collect();

        let mut mapping = IndexMap::new();
        for (target, candidates) in CANDIDATES.iter() {
            if let Some(original) = candidates
                .iter()
                .find_map(|cand| lower_cols.get(&cand.to_lowercase()))
            {
                mapping.insert(target.to_string(), original.to_string());
            }
        }

        mapping
    }
}

/// 便捷函数，见 [`ColumnGuesser::guess`]
pub fn guess_columns<S: AsRef<str>>(columns: &[S]) -> IndexMap<String, String> {
    ColumnGuesser::guess(columns)
}
