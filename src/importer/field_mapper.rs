// ==========================================
// 会议程序构建器 - 字段映射器
// ==========================================
// 职责: 原始表 + 映射（标准字段 → 源列名）→ 标准字段表
// 规则: 精确列名优先，其次 trim 后匹配；未解析的字段整列为空
// ==========================================

use crate::domain::types::DEFAULT_TARGET_FIELDS;
use crate::domain::workbook::RawTable;
use crate::importer::data_cleaner::clean_str;
use indexmap::IndexMap;
use tracing::debug;

/// 标准字段 → 源列名（None / 空串表示未映射）
pub type ColumnMapping = IndexMap<String, Option<String>>;

// ==========================================
// CanonicalRow - 标准字段行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalRow {
    /// 源表中的行号（0 起，不含表头）
    pub source_index: usize,
    /// 标准字段 → 清洗后的文本
    pub fields: IndexMap<String, String>,
    /// 唯一 ID 列的值（未配置或不存在时为空）
    pub uid: String,
}

impl CanonicalRow {
    /// 读取字段（缺失视为空）
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(|s| s.as_str()).unwrap_or("")
    }
}

// ==========================================
// CanonicalTable - 标准字段表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalTable {
    pub sheet_name: String,
    /// 字段顺序：映射字段在前，默认字段补齐
    pub fields: Vec<String>,
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

pub struct FieldMapper;

impl FieldMapper {
    /// 应用映射
    ///
    /// # 参数
    /// - table: 原始表
    /// - mapping: 标准字段 → 源列名
    /// - uid_column: 唯一 ID 列（可为标准字段名或源列名）
    ///
    /// # 返回
    /// - 每个源行对应一行，行号与源表一致
    pub fn apply(table: &RawTable, mapping: &ColumnMapping, uid_column: Option<&str>) -> CanonicalTable {
        // 字段 → 源列下标
        let mut resolved: Vec<(String, Option<usize>)> = Vec::new();
        for (target, source) in mapping {
            let idx = source
                .as_deref()
                .and_then(|col| table.resolve_column(col));
            if idx.is_none() {
                debug!(sheet = %table.name, field = %target, source = ?source, "字段未解析，整列置空");
            }
            resolved.push((target.clone(), idx));
        }
        for default in DEFAULT_TARGET_FIELDS {
            if !mapping.contains_key(default) {
                resolved.push((default.to_string(), None));
            }
        }

        let fields: Vec<String> = resolved.iter().map(|(f, _)| f.clone()).collect();

        // 唯一 ID 列：优先标准字段，其次源列
        let uid_column = uid_column.map(str::trim).filter(|c| !c.is_empty());
        let uid_is_field = uid_column.map_or(false, |c| fields.iter().any(|f| f == c));
        let uid_raw_idx = match uid_column {
            Some(c) if !uid_is_field => table.resolve_column(c),
            _ => None,
        };

        let rows = (0..table.len())
            .map(|row_idx| {
                let row_fields: IndexMap<String, String> = resolved
                    .iter()
                    .map(|(field, idx)| {
                        let value = idx
                            .map(|col| clean_str(table.cell(row_idx, col)))
                            .unwrap_or_default();
                        (field.clone(), value)
                    })
                    .collect();

                let uid = match (uid_column, uid_raw_idx) {
                    (Some(c), _) if uid_is_field => row_fields.get(c).cloned().unwrap_or_default(),
                    (_, Some(col)) => clean_str(table.cell(row_idx, col)),
                    _ => String::new(),
                };

                CanonicalRow {
                    source_index: row_idx,
                    fields: row_fields,
                    uid,
                }
            })
            .collect();

        CanonicalTable {
            sheet_name: table.name.clone(),
            fields,
            rows,
        }
    }

    /// 映射中值非空的字段（通用记录保留字段）
    pub fn keep_fields(mapping: &ColumnMapping) -> Vec<String> {
        mapping
            .iter()
            .filter(|(_, source)| source.as_deref().map_or(false, |s| !s.is_empty()))
            .map(|(field, _)| field.clone())
            .collect()
    }
}

/// 便捷函数，见 [`FieldMapper::apply`]
pub fn apply_mapping(table: &RawTable, mapping: &ColumnMapping, uid_column: Option<&str>) -> CanonicalTable {
    FieldMapper::apply(table, mapping, uid_column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workbook::CellValue;

    fn sample_table() -> RawTable {
        RawTable::new(
            "Oct 16",
            vec!["Hora".to_string(), " Tema ".to_string(), "Code".to_string()],
            vec![
                vec![
                    CellValue::from("9:00"),
                    CellValue::from("  Opening  "),
                    CellValue::from("S-1"),
                ],
                vec![CellValue::Empty, CellValue::Float(f64::NAN), CellValue::Int(7)],
            ],
        )
    }

    fn mapping(pairs: &[(&str, Option<&str>)]) -> ColumnMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
            .collect()
    }

    #[test]
    fn test_apply_fills_default_fields() {
        let table = sample_table();
        let out = apply_mapping(&table, &mapping(&[("time", Some("Hora"))]), None);

        assert_eq!(out.len(), 2);
        for field in DEFAULT_TARGET_FIELDS {
            assert!(out.has_field(field), "missing {field}");
        }
        assert_eq!(out.rows[0].get("time"), "9:00");
        assert_eq!(out.rows[0].get("title"), "");
    }

    #[test]
    fn test_apply_trimmed_column_match_and_clean() {
        let table = sample_table();
        let out = apply_mapping(&table, &mapping(&[("title", Some("Tema"))]), None);

        assert_eq!(out.rows[0].get("title"), "Opening");
        assert_eq!(out.rows[1].get("title"), "");
    }

    #[test]
    fn test_apply_unresolved_and_null_mapping() {
        let table = sample_table();
        let out = apply_mapping(
            &table,
            &mapping(&[("speaker", Some("Ponente")), ("chair", None), ("bio", Some(""))]),
            None,
        );

        assert!(out.has_field("bio"));
        assert!(out.rows.iter().all(|r| r.get("speaker").is_empty()));
        assert!(out.rows.iter().all(|r| r.get("bio").is_empty()));
    }

    #[test]
    fn test_uid_from_raw_column() {
        let table = sample_table();
        let out = apply_mapping(&table, &mapping(&[("time", Some("Hora"))]), Some("Code"));

        assert_eq!(out.rows[0].uid, "S-1");
        assert_eq!(out.rows[1].uid, "7");
    }

    #[test]
    fn test_uid_from_canonical_field() {
        let table = sample_table();
        let out = apply_mapping(&table, &mapping(&[("id", Some("Code"))]), Some("id"));

        assert_eq!(out.rows[0].uid, "S-1");
    }

    #[test]
    fn test_source_index_preserved() {
        let table = sample_table();
        let out = apply_mapping(&table, &ColumnMapping::new(), None);
        assert_eq!(out.rows[1].source_index, 1);
    }

    #[test]
    fn test_keep_fields() {
        let m = mapping(&[("name", Some("Nombre")), ("bio", None), ("photo", Some(""))]);
        assert_eq!(FieldMapper::keep_fields(&m), vec!["name".to_string()]);
    }
}
