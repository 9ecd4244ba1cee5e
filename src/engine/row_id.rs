// ==========================================
// 会议程序构建器 - 记录 ID 生成
// ==========================================
// 规则: uid-column 且唯一 ID 非空 → slug(uid)
//       否则 → "{slug}-{源行号}"
// ==========================================

use crate::importer::data_cleaner::slugify;
use crate::importer::field_mapper::CanonicalRow;

/// ID 生成器（每个表一个）
#[derive(Debug, Clone)]
pub struct RowIdAssigner {
    slug: String,
    use_uid: bool,
}

impl RowIdAssigner {
    /// # 参数
    /// - slug: 表的 ID 前缀
    /// - use_uid: 是否启用唯一 ID 列（uid-column 且已配置列）
    pub fn new(slug: impl Into<String>, use_uid: bool) -> Self {
        Self {
            slug: slug.into(),
            use_uid,
        }
    }

    pub fn assign(&self, row: &CanonicalRow) -> String {
        if self.use_uid {
            let uid = slugify(&row.uid);
            if !uid.is_empty() {
                return uid;
            }
        }
        format!("{}-{}", self.slug, row.source_index)
    }
}
