// ==========================================
// 会议程序构建器 - 赞助商 Logo 补全
// ==========================================
// 时机: 所有表构建完成后、校验之前，每次请求一次
// 规则:
//   1. 识别赞助商分组（可替换的识别策略）
//   2. 建立 by_id / by_name 两张索引（不区分大小写）
//   3. sponsor_logo 为空的 Session：先按 sponsor_id，再按名称
// 不变量: 已有 sponsor_logo 不会被覆盖（幂等）
// ==========================================

use crate::domain::record::{GenericItem, OutputGroup, ProgramData, SessionRecord};
use crate::domain::types::{SheetType, LOGO_KEYS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

// ==========================================
// 赞助商分组识别策略
// ==========================================

pub trait SponsorGroupDetector: Send + Sync {
    /// 返回被识别为赞助商表的分组（至多一个）
    fn detect<'a>(&self, groups: &'a [OutputGroup]) -> Option<&'a OutputGroup>;
}

/// 默认策略：第一个非 program 分组，且首条记录含 logo/logo_url/image 键
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoKeyDetector;

impl SponsorGroupDetector for LogoKeyDetector {
    fn detect<'a>(&self, groups: &'a [OutputGroup]) -> Option<&'a OutputGroup> {
        groups.iter().find(|group| {
            !group.sheet_type.is_program()
                && group
                    .as_items()
                    .and_then(|items| items.first())
                    .map_or(false, |first| LOGO_KEYS.iter().any(|k| first.has_field(k)))
        })
    }
}

/// 显式标注策略：第一个 sheet_type = sponsors 的分组
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetTypeDetector;

impl SponsorGroupDetector for SheetTypeDetector {
    fn detect<'a>(&self, groups: &'a [OutputGroup]) -> Option<&'a OutputGroup> {
        groups
            .iter()
            .find(|group| group.sheet_type == SheetType::Sponsors && group.as_items().is_some())
    }
}

/// 识别策略选择（配置/命令行使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SponsorDetection {
    #[default]
    LogoKey,
    SheetType,
}

impl SponsorDetection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorDetection::LogoKey => "logo-key",
            SponsorDetection::SheetType => "sheet-type",
        }
    }

    pub fn detector(&self) -> Box<dyn SponsorGroupDetector> {
        match self {
            SponsorDetection::LogoKey => Box::new(LogoKeyDetector),
            SponsorDetection::SheetType => Box::new(SheetTypeDetector),
        }
    }
}

impl std::str::FromStr for SponsorDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logo-key" | "logo_key" => Ok(SponsorDetection::LogoKey),
            "sheet-type" | "sheet_type" => Ok(SponsorDetection::SheetType),
            other => Err(format!("unknown sponsor detection strategy: {}", other)),
        }
    }
}

// ==========================================
// SponsorIndex - Logo 查找表
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorIndex {
    by_id: HashMap<String, String>,
    by_name: HashMap<String, String>,
}

impl SponsorIndex {
    /// 从赞助商记录建立索引；同键后出现者覆盖
    ///
    /// 无 Logo 的记录同样入索引：命中后返回空串，不再回退到名称查找
    pub fn from_items(items: &[GenericItem]) -> Self {
        let mut index = Self::default();

        for item in items {
            let logo = LOGO_KEYS
                .iter()
                .filter_map(|k| item.get(k))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .unwrap_or("");

            let name = item.get("name").unwrap_or("").trim().to_lowercase();
            let mut id = item.id.trim().to_lowercase();
            if id.is_empty() {
                id = name.clone();
            }

            if !id.is_empty() {
                index.by_id.insert(id, logo.to_string());
            }
            if !name.is_empty() {
                index.by_name.insert(name, logo.to_string());
            }
        }

        index
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_name.is_empty()
    }

    /// 查找 Session 的 Logo：by_id 优先，其次 by_name
    ///
    /// 返回 `Some("")` 表示命中了无 Logo 的赞助商
    pub fn lookup(&self, session: &SessionRecord) -> Option<&str> {
        let sponsor_id = session.sponsor_id.trim().to_lowercase();
        if !sponsor_id.is_empty() {
            if let Some(logo) = self.by_id.get(&sponsor_id) {
                return Some(logo.as_str());
            }
        }

        let name = session.sponsor_lookup_name()?.to_lowercase();
        self.by_name.get(&name).map(String::as_str)
    }
}

// ==========================================
// SponsorEnricher
// ==========================================

pub struct SponsorEnricher {
    detector: Box<dyn SponsorGroupDetector>,
}

impl Default for SponsorEnricher {
    fn default() -> Self {
        Self::new(Box::new(LogoKeyDetector))
    }
}

impl SponsorEnricher {
    pub fn new(detector: Box<dyn SponsorGroupDetector>) -> Self {
        Self { detector }
    }

    /// 补全 Logo
    ///
    /// # 返回
    /// - 本次补全的 Session 数
    pub fn enrich(&self, data: &mut ProgramData) -> usize {
        let index = match self.detector.detect(data.groups()) {
            Some(group) => {
                debug!(group = %group.key, "识别到赞助商分组");
                SponsorIndex::from_items(group.as_items().unwrap_or(&[]))
            }
            None => {
                debug!("未识别到赞助商分组，跳过 Logo 补全");
                return 0;
            }
        };

        if index.is_empty() {
            return 0;
        }

        let mut filled = 0;
        for group in data.groups_mut() {
            let Some(sessions) = group.as_sessions_mut() else {
                continue;
            };
            for session in sessions.iter_mut() {
                if !session.sponsor_logo.trim().is_empty() {
                    continue;
                }
                if let Some(logo) = index.lookup(session).filter(|logo| !logo.is_empty()) {
                    session.sponsor_logo = logo.to_string();
                    filled += 1;
                }
            }
        }

        info!(filled, "赞助商 Logo 补全完成");
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, pairs: &[(&str, &str)]) -> GenericItem {
        GenericItem {
            id: id.to_string(),
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn session(id: &str, sponsor_id: &str, sponsor: &str) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            title: "Talk".to_string(),
            sponsor_id: sponsor_id.to_string(),
            sponsor: sponsor.to_string(),
            ..Default::default()
        }
    }

    fn program(sponsors: Vec<GenericItem>, sessions: Vec<SessionRecord>) -> ProgramData {
        let mut data = ProgramData::new();
        data.upsert(OutputGroup::sessions("day1", sessions));
        data.upsert(OutputGroup::items("sponsors", SheetType::Sponsors, sponsors));
        data
    }

    fn logos(data: &ProgramData) -> Vec<String> {
        data.get("day1")
            .and_then(|g| g.as_sessions())
            .unwrap()
            .iter()
            .map(|s| s.sponsor_logo.clone())
            .collect()
    }

    #[test]
    fn test_enrich_by_id() {
        let mut data = program(
            vec![item("sp01", &[("name", "ACME"), ("logo", "L1")])],
            vec![session("s1", "sp01", "")],
        );
        let filled = SponsorEnricher::default().enrich(&mut data);
        assert_eq!(filled, 1);
        assert_eq!(logos(&data), vec!["L1"]);
    }

    #[test]
    fn test_enrich_by_name_case_insensitive() {
        let mut data = program(
            vec![item("sp01", &[("name", "ACME"), ("logo_url", "L1")])],
            vec![session("s1", "", " acme ")],
        );
        SponsorEnricher::default().enrich(&mut data);
        assert_eq!(logos(&data), vec!["L1"]);
    }

    #[test]
    fn test_id_takes_precedence_over_name() {
        let mut data = program(
            vec![
                item("sp01", &[("name", "ACME"), ("logo", "L1")]),
                item("sp02", &[("name", "Globex"), ("logo", "L2")]),
            ],
            vec![session("s1", "SP02", "ACME")],
        );
        SponsorEnricher::default().enrich(&mut data);
        assert_eq!(logos(&data), vec!["L2"]);
    }

    #[test]
    fn test_existing_logo_kept_and_idempotent() {
        let mut existing = session("s1", "sp01", "");
        existing.sponsor_logo = "MINE".to_string();
        let mut data = program(
            vec![item("sp01", &[("name", "ACME"), ("logo", "L1")])],
            vec![existing, session("s2", "sp01", "")],
        );

        let enricher = SponsorEnricher::default();
        enricher.enrich(&mut data);
        let once = data.clone();
        assert_eq!(enricher.enrich(&mut data), 0);
        assert_eq!(data, once);
        assert_eq!(logos(&data), vec!["MINE", "L1"]);
    }

    #[test]
    fn test_no_match_leaves_empty() {
        let mut data = program(
            vec![item("sp01", &[("name", "ACME"), ("logo", "L1")])],
            vec![session("s1", "zz", "Nobody")],
        );
        SponsorEnricher::default().enrich(&mut data);
        assert_eq!(logos(&data), vec![""]);
    }

    #[test]
    fn test_logo_key_detector_requires_logo_like_key() {
        let mut data = ProgramData::new();
        data.upsert(OutputGroup::items("faculty", SheetType::Faculty, vec![item("f1", &[("name", "Dr. X")])]));
        data.upsert(OutputGroup::items("partners", SheetType::Custom, vec![item("p1", &[("image", "I1")])]));

        let found = LogoKeyDetector.detect(data.groups()).unwrap();
        assert_eq!(found.key, "partners");
        assert!(SheetTypeDetector.detect(data.groups()).is_none());
    }

    #[test]
    fn test_index_falls_back_to_name_key() {
        let index = SponsorIndex::from_items(&[item("", &[("name", "ACME"), ("logo", "L1")])]);
        assert_eq!(index.lookup(&session("s", "acme", "")), Some("L1"));
    }

    #[test]
    fn test_id_match_without_logo_stops_lookup() {
        let mut data = program(
            vec![
                item("sp01", &[("name", "ACME"), ("logo", "")]),
                item("sp02", &[("name", "Globex"), ("logo", "L2")]),
            ],
            vec![session("s1", "sp01", "Globex"), session("s2", "", "Globex")],
        );

        let filled = SponsorEnricher::default().enrich(&mut data);
        assert_eq!(filled, 1);
        assert_eq!(logos(&data), vec!["", "L2"]);
    }

    #[test]
    fn test_later_entry_without_logo_overwrites() {
        let index = SponsorIndex::from_items(&[
            item("sp01", &[("name", "ACME"), ("logo", "L1")]),
            item("sp01", &[("name", "ACME"), ("logo", "")]),
        ]);
        assert_eq!(index.lookup(&session("s", "sp01", "")), Some(""));
    }

    #[test]
    fn test_detection_from_str() {
        assert_eq!("sheet-type".parse::<SponsorDetection>().unwrap(), SponsorDetection::SheetType);
        assert!("other".parse::<SponsorDetection>().is_err());
    }
}
