// ==========================================
// 会议程序构建器 - 通用记录构建器
// ==========================================
// 适用: faculty / sponsors / custom 表
// 规则: 仅保留映射中非空的字段；保留字段全空的行丢弃
// ==========================================

use crate::domain::record::GenericItem;
use crate::engine::row_id::RowIdAssigner;
use crate::importer::field_mapper::CanonicalTable;
use indexmap::IndexMap;
use tracing::debug;

pub struct ItemBuilder {
    ids: RowIdAssigner,
    keep: Vec<String>,
}

impl ItemBuilder {
    /// # 参数
    /// - keep: 保留字段（见 `FieldMapper::keep_fields`）
    pub fn new(ids: RowIdAssigner, keep: Vec<String>) -> Self {
        Self { ids, keep }
    }

    pub fn build(&self, table: &CanonicalTable) -> Vec<GenericItem> {
        let items: Vec<GenericItem> = table
            .rows
            .iter()
            .filter_map(|row| {
                let fields: IndexMap<String, String> = self
                    .keep
                    .iter()
                    .filter(|field| field.as_str() != "id")
                    .map(|field| (field.clone(), row.get(field).to_string()))
                    .collect();

                let has_content = self.keep.iter().any(|field| !row.get(field).trim().is_empty());
                if !has_content {
                    return None;
                }

                Some(GenericItem {
                    id: self.ids.assign(row),
                    fields,
                })
            })
            .collect();

        debug!(
            sheet = %table.sheet_name,
            rows = table.len(),
            items = items.len(),
            "通用记录构建完成"
        );
        items
    }
}
