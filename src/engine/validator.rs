// ==========================================
// 会议程序构建器 - 输出校验器
// ==========================================
// 级别: error 阻断构建；warning 仅提示
// 规则:
//   - Session: 缺失/重复 ID（error），重复 (时间,标题)、时间格式、仅 Chair 行（warning）
//   - 讲者/赞助商: 缺失/重复 ID、缺失名称（error）
// 说明: 校验不修改数据，不中断后续行/分组
// ==========================================

use crate::domain::record::{GenericItem, OutputGroup, ProgramData, SessionRecord};
use crate::importer::data_cleaner::DataCleaner;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

// "HH:MM" 或 "HH:MM - HH:MM"（'.' 先替换为 ':'）
static TIME_FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2}:\d{2})(\s*-\s*(\d{1,2}:\d{2}))?\s*$").expect("valid time format regex")
});

/// 校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn warn(&mut self, key: &str, message: impl AsRef<str>) {
        self.warnings.push(format!("[{}] {}", key, message.as_ref()));
    }

    pub fn error(&mut self, key: &str, message: impl AsRef<str>) {
        self.errors.push(format!("[{}] {}", key, message.as_ref()));
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 通用记录校验器选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidatorKind {
    People,
    Sponsors,
}

impl ItemValidatorKind {
    /// 按分组 key 前缀选择（faculty → 讲者，sponsor → 赞助商）
    pub fn for_group_key(key: &str) -> Option<Self> {
        let lower = key.to_lowercase();
        if lower.starts_with("faculty") {
            Some(ItemValidatorKind::People)
        } else if lower.starts_with("sponsor") {
            Some(ItemValidatorKind::Sponsors)
        } else {
            None
        }
    }
}

pub struct OutputValidator;

impl OutputValidator {
    /// 校验全部分组
    pub fn validate(data: &ProgramData) -> ValidationReport {
        let mut report = ValidationReport::default();

        for group in data.groups() {
            report.merge(Self::validate_group(group));
        }

        debug!(
            groups = data.len(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "输出校验完成"
        );
        report
    }

    pub fn validate_group(group: &OutputGroup) -> ValidationReport {
        if let Some(sessions) = group.as_sessions() {
            return validate_sessions(&group.key, sessions);
        }
        match (group.as_items(), ItemValidatorKind::for_group_key(&group.key)) {
            (Some(items), Some(ItemValidatorKind::People)) => validate_people(&group.key, items),
            (Some(items), Some(ItemValidatorKind::Sponsors)) => validate_sponsors(&group.key, items),
            _ => ValidationReport::default(),
        }
    }
}

/// Session 分组校验
pub fn validate_sessions(key: &str, sessions: &[SessionRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_pairs: HashSet<(String, String)> = HashSet::new();

    for session in sessions {
        let sid = DataCleaner::clean_text(&session.id);
        check_id(&mut report, key, &sid, &mut seen_ids);

        let time = DataCleaner::clean_text(&session.time);
        let title = DataCleaner::clean_text(&session.title);

        if !time.is_empty() && !title.is_empty() {
            let pair = (time.clone(), title.clone());
            if seen_pairs.contains(&pair) {
                report.warn(key, format!("Duplicate (time,title): {} | {}", time, title));
            } else {
                seen_pairs.insert(pair);
            }
        }

        if !time.is_empty() && !TIME_FORMAT_RE.is_match(&time.replace('.', ":")) {
            report.warn(key, format!("Unrecognized time format: '{}'", time));
        }

        let chair = DataCleaner::clean_text(&session.chair);
        if !chair.is_empty() && title.is_empty() && session.speaker.is_empty() {
            report.warn(key, format!("Row with Chair only (possible section header): id={}", sid));
        }
    }

    report
}

/// 讲者分组校验
pub fn validate_people(key: &str, items: &[GenericItem]) -> ValidationReport {
    validate_named_items(key, items)
}

/// 赞助商分组校验
pub fn validate_sponsors(key: &str, items: &[GenericItem]) -> ValidationReport {
    validate_named_items(key, items)
}

fn validate_named_items(key: &str, items: &[GenericItem]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for item in items {
        let iid = DataCleaner::clean_text(&item.id);
        check_id(&mut report, key, &iid, &mut seen_ids);

        let name = DataCleaner::clean_text(item.get("name").unwrap_or(""));
        if name.is_empty() {
            let label = if iid.is_empty() { "(no id)" } else { iid.as_str() };
            report.error(key, format!("Missing name for id={}", label));
        }
    }

    report
}

// 缺失 / 重复 ID；首次出现者保留
fn check_id(report: &mut ValidationReport, key: &str, id: &str, seen: &mut HashSet<String>) {
    if id.is_empty() {
        report.error(key, "Missing id");
    } else if !seen.insert(id.to_string()) {
        report.error(key, format!("Duplicate id: {}", id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SheetType;

    fn session(id: &str, time: &str, title: &str) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            time: time.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn item(id: &str, name: &str) -> GenericItem {
        let mut item = GenericItem {
            id: id.to_string(),
            ..Default::default()
        };
        item.fields.insert("name".to_string(), name.to_string());
        item
    }

    #[test]
    fn test_every_duplicate_reported() {
        let report = validate_sessions(
            "day1",
            &[
                session("a", "09:00", "T1"),
                session("a", "10:00", "T2"),
                session("a", "11:00", "T3"),
                session("", "12:00", "T4"),
            ],
        );
        assert_eq!(
            report.errors,
            vec![
                "[day1] Duplicate id: a",
                "[day1] Duplicate id: a",
                "[day1] Missing id",
            ]
        );
    }

    #[test]
    fn test_duplicate_time_title_is_warning() {
        let report = validate_sessions(
            "day1",
            &[session("a", "09:00", "Talk"), session("b", "09:00", "Talk")],
        );
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings, vec!["[day1] Duplicate (time,title): 09:00 | Talk"]);
    }

    #[test]
    fn test_time_format_warning() {
        let report = validate_sessions(
            "day1",
            &[
                session("a", "9.05 - 10.30", "A"),
                session("b", "09:00 - 10:00", "B"),
                session("c", "morning", "C"),
            ],
        );
        assert_eq!(report.warnings, vec!["[day1] Unrecognized time format: 'morning'"]);
    }

    #[test]
    fn test_chair_only_row_warning() {
        let mut header = session("day1-3", "", "");
        header.chair = "Dr. X".to_string();
        let report = validate_sessions("day1", &[header]);
        assert_eq!(
            report.warnings,
            vec!["[day1] Row with Chair only (possible section header): id=day1-3"]
        );
    }

    #[test]
    fn test_people_missing_name() {
        let report = validate_people("faculty", &[item("f1", ""), item("", "nan")]);
        assert_eq!(
            report.errors,
            vec![
                "[faculty] Missing name for id=f1",
                "[faculty] Missing id",
                "[faculty] Missing name for id=(no id)",
            ]
        );
    }

    #[test]
    fn test_dispatch_by_key_prefix() {
        let mut data = ProgramData::new();
        data.upsert(OutputGroup::items("Faculty_A", SheetType::Custom, vec![item("f1", "")]));
        data.upsert(OutputGroup::items("sponsors", SheetType::Sponsors, vec![item("s1", "A"), item("s1", "B")]));
        data.upsert(OutputGroup::items("partners", SheetType::Sponsors, vec![item("", "")]));

        let report = OutputValidator::validate(&data);
        assert_eq!(
            report.errors,
            vec!["[Faculty_A] Missing name for id=f1", "[sponsors] Duplicate id: s1"]
        );
    }

    #[test]
    fn test_ids_checked_per_group() {
        let mut data = ProgramData::new();
        data.upsert(OutputGroup::sessions("day1", vec![session("a", "09:00", "A")]));
        data.upsert(OutputGroup::sessions("day2", vec![session("a", "09:00", "A")]));
        assert!(!OutputValidator::validate(&data).has_errors());
    }
}
