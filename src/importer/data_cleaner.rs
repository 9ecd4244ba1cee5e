// ==========================================
// 会议程序构建器 - 数据清洗
// ==========================================
// 职责: TRIM / NULL 标准化 / slug 生成
// 说明: 纯函数，不返回错误；异常值一律降级为空字符串
// ==========================================

use crate::domain::workbook::CellValue;

pub struct DataCleaner;

impl DataCleaner {
    /// 单元格 → 去空白文本（空 / NaN → ""）
    pub fn clean_cell(cell: &CellValue) -> String {
        cell.to_text().trim().to_string()
    }

    /// 文本标准化：trim，字面量 "nan"（不区分大小写）视为空
    pub fn clean_text(value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("nan") {
            String::new()
        } else {
            trimmed.to_string()
        }
    }

    /// 生成 URL 安全标识
    ///
    /// 非字母数字字符串折叠为单个连字符，去掉首尾连字符
    pub fn slugify(text: &str) -> String {
        let mut slug = String::with_capacity(text.len());
        let mut pending_hyphen = false;

        for ch in text.trim().to_lowercase().chars() {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            } else {
                pending_hyphen = true;
            }
        }

        slug
    }
}

/// 便捷函数，见 [`DataCleaner::slugify`]
pub fn slugify(text: &str) -> String {
    DataCleaner::slugify(text)
}

/// 便捷函数，见 [`DataCleaner::clean_cell`]
pub fn clean_str(cell: &CellValue) -> String {
    DataCleaner::clean_cell(cell)
}
