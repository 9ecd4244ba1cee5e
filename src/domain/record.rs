// ==========================================
// 会议程序构建器 - 输出记录
// ==========================================
// 职责: Session / GenericItem 两类输出记录 + 分组 + 响应结构
// 说明: 固定字段结构体 + 扩展字段表（flatten 输出）
// ==========================================

use crate::domain::types::SheetType;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use indexmap::IndexMap;

// ==========================================
// Speakers - 讲者（单字符串或拆分后的列表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speakers {
    One(String),
    Many(Vec<String>),
}

impl Default for Speakers {
    fn default() -> Self {
        Speakers::One(String::new())
    }
}

impl Speakers {
    pub fn is_empty(&self) -> bool {
        match self {
            Speakers::One(s) => s.trim().is_empty(),
            Speakers::Many(parts) => parts.iter().all(|p| p.trim().is_empty()),
        }
    }

    /// 用于校验信息的展示文本
    pub fn display_text(&self) -> String {
        match self {
            Speakers::One(s) => s.clone(),
            Speakers::Many(parts) => parts.join(", "),
        }
    }
}

// ==========================================
// SessionRecord - 日程记录（program 表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub time: String,
    pub title: String,
    pub speaker: Speakers,
    pub chair: String,
    pub track: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub room: String,
    pub notes: String,
    pub sponsor: String,
    pub sponsor_name: String,
    pub sponsored_by: String,
    pub sponsor_id: String,
    pub sponsor_logo: String,

    /// 映射中额外保留的自定义字段
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl SessionRecord {
    /// 按字段名读取文本（讲者列表以逗号连接；未知字段查扩展表）
    pub fn text_field(&self, field: &str) -> String {
        match field {
            "id" => self.id.clone(),
            "time" => self.time.clone(),
            "title" => self.title.clone(),
            "speaker" => self.speaker.display_text(),
            "chair" => self.chair.clone(),
            "track" => self.track.clone(),
            "type" => self.session_type.clone(),
            "room" => self.room.clone(),
            "notes" => self.notes.clone(),
            "sponsor" => self.sponsor.clone(),
            "sponsor_name" => self.sponsor_name.clone(),
            "sponsored_by" => self.sponsored_by.clone(),
            "sponsor_id" => self.sponsor_id.clone(),
            "sponsor_logo" => self.sponsor_logo.clone(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }

    /// 赞助商名称查找键：sponsor → sponsored_by → sponsor_name
    pub fn sponsor_lookup_name(&self) -> Option<&str> {
        [&self.sponsor, &self.sponsored_by, &self.sponsor_name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

// ==========================================
// GenericItem - 通用记录（faculty / sponsors / custom 表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenericItem {
    pub id: String,

    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl GenericItem {
    /// 读取字段（id 字段返回记录 ID）
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == "id" {
            return Some(self.id.as_str());
        }
        self.fields.get(key).map(|s| s.as_str())
    }

    /// 字段存在（不论是否为空）
    pub fn has_field(&self, key: &str) -> bool {
        key == "id" || self.fields.contains_key(key)
    }
}

// ==========================================
// OutputGroup - 一个配置表的输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupRecords {
    Sessions(Vec<SessionRecord>),
    Items(Vec<GenericItem>),
}

impl GroupRecords {
    pub fn len(&self) -> usize {
        match self {
            GroupRecords::Sessions(v) => v.len(),
            GroupRecords::Items(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputGroup {
    pub key: String,
    pub sheet_type: SheetType,
    pub records: GroupRecords,
}

impl OutputGroup {
    pub fn sessions(key: impl Into<String>, records: Vec<SessionRecord>) -> Self {
        Self {
            key: key.into(),
            sheet_type: SheetType::Program,
            records: GroupRecords::Sessions(records),
        }
    }

    pub fn items(key: impl Into<String>, sheet_type: SheetType, records: Vec<GenericItem>) -> Self {
        Self {
            key: key.into(),
            sheet_type,
            records: GroupRecords::Items(records),
        }
    }

    pub fn as_items(&self) -> Option<&[GenericItem]> {
        match &self.records {
            GroupRecords::Items(v) => Some(v),
            GroupRecords::Sessions(_) => None,
        }
    }

    pub fn as_sessions(&self) -> Option<&[SessionRecord]> {
        match &self.records {
            GroupRecords::Sessions(v) => Some(v),
            GroupRecords::Items(_) => None,
        }
    }

    pub fn as_sessions_mut(&mut self) -> Option<&mut [SessionRecord]> {
        match &mut self.records {
            GroupRecords::Sessions(v) => Some(v),
            GroupRecords::Items(_) => None,
        }
    }
}

// ==========================================
// ProgramData - 有序分组集合（输出 JSON 为 key → 记录列表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgramData {
    groups: Vec<OutputGroup>,
}

impl ProgramData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入分组；同 key 分组原位替换
    pub fn upsert(&mut self, group: OutputGroup) {
        match self.groups.iter_mut().find(|g| g.key == group.key) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OutputGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn groups(&self) -> &[OutputGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [OutputGroup] {
        &mut self.groups
    }

    pub fn keys(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for ProgramData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.key, &group.records)?;
        }
        map.end()
    }
}

// ==========================================
// 响应结构
// ==========================================

/// 预览响应：{data, warnings, errors}
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreviewResponse {
    pub data: ProgramData,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl PreviewResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 工作表摘要：列名 + 猜测映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub guess: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_serializes_type_and_extra() {
        let mut record = SessionRecord {
            id: "day1-0".to_string(),
            session_type: "Keynote".to_string(),
            ..Default::default()
        };
        record.extra.insert("stream_url".to_string(), "https://x".to_string());

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["type"], "Keynote");
        assert_eq!(v["stream_url"], "https://x");
        assert_eq!(v["speaker"], "");
    }

    #[test]
    fn test_speakers_many_serializes_as_array() {
        let record = SessionRecord {
            speaker: Speakers::Many(vec!["A".to_string(), "B".to_string()]),
            ..Default::default()
        };
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["speaker"], json!(["A", "B"]));
    }

    #[test]
    fn test_program_data_upsert_keeps_position() {
        let mut data = ProgramData::new();
        data.upsert(OutputGroup::sessions("day1", vec![]));
        data.upsert(OutputGroup::sessions("day2", vec![]));
        data.upsert(OutputGroup::items("day1", SheetType::Custom, vec![]));

        assert_eq!(data.keys(), vec!["day1", "day2"]);
        assert!(data.get("day1").unwrap().as_items().is_some());
    }

    #[test]
    fn test_generic_item_flatten() {
        let mut item = GenericItem {
            id: "sp01".to_string(),
            ..Default::default()
        };
        item.fields.insert("name".to_string(), "ACME".to_string());

        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v, json!({"id": "sp01", "name": "ACME"}));
        assert!(item.has_field("name"));
        assert!(!item.has_field("logo"));
    }

    #[test]
    fn test_sponsor_lookup_name_order() {
        let record = SessionRecord {
            sponsored_by: "Globex".to_string(),
            sponsor_name: "ACME".to_string(),
            ..Default::default()
        };
        assert_eq!(record.sponsor_lookup_name(), Some("Globex"));
    }
}
