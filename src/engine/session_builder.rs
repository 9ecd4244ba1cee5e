// ==========================================
// 会议程序构建器 - Session 构建器
// ==========================================
// 流程（逐行）:
//   时间规范化 → Chair 提取 → 讲者拆分 → 赞助商回退 → 分配 ID → 丢弃空行
// 说明: 不因单元格异常报错，异常统一降级为空值
// ==========================================

use crate::config::CompiledOptions;
use crate::domain::record::{SessionRecord, Speakers};
use crate::domain::types::{is_session_field, SESSION_CONTENT_FIELDS};
use crate::engine::row_id::RowIdAssigner;
use crate::importer::field_mapper::{CanonicalRow, CanonicalTable};
use crate::importer::time_normalizer::normalize_time;
use indexmap::IndexMap;
use tracing::debug;

pub struct SessionBuilder<'a> {
    ids: RowIdAssigner,
    options: &'a CompiledOptions,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(ids: RowIdAssigner, options: &'a CompiledOptions) -> Self {
        Self { ids, options }
    }

    /// 构建整表
    pub fn build(&self, table: &CanonicalTable) -> Vec<SessionRecord> {
        let sessions: Vec<SessionRecord> = table
            .rows
            .iter()
            .filter_map(|row| self.build_row(row))
            .collect();

        debug!(
            sheet = %table.sheet_name,
            rows = table.len(),
            sessions = sessions.len(),
            dropped = table.len() - sessions.len(),
            "Session 构建完成"
        );
        sessions
    }

    /// 构建单行；全空行返回 None
    pub fn build_row(&self, row: &CanonicalRow) -> Option<SessionRecord> {
        let (chair, speaker) = self.extract_chair_and_speaker(row.get("speaker"), row.get("chair"));

        let sponsor = [row.get("sponsor"), row.get("sponsor_name"), row.get("sponsored_by")]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_string();

        let extra: IndexMap<String, String> = row
            .fields
            .iter()
            .filter(|(field, _)| !is_session_field(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();

        let record = SessionRecord {
            id: self.ids.assign(row),
            time: normalize_time(row.get("time")),
            title: row.get("title").to_string(),
            speaker: self.split_speakers(speaker),
            chair,
            track: row.get("track").to_string(),
            session_type: row.get("type").to_string(),
            room: row.get("room").to_string(),
            notes: row.get("notes").to_string(),
            sponsor,
            sponsor_name: row.get("sponsor_name").to_string(),
            sponsored_by: row.get("sponsored_by").to_string(),
            sponsor_id: row.get("sponsor_id").to_string(),
            sponsor_logo: row.get("sponsor_logo").to_string(),
            extra,
        };

        if is_blank_session(&record) {
            return None;
        }
        Some(record)
    }

    /// Chair 提取
    ///
    /// 讲者以 Chair 前缀开头且未映射 Chair 时：去掉前缀作为 Chair，清空讲者
    ///
    /// # 返回
    /// - (chair, speaker)
    pub fn extract_chair_and_speaker(&self, speaker: &str, chair: &str) -> (String, String) {
        if self.options.chair_from_speaker && chair.is_empty() && !speaker.is_empty() {
            let starts_with_prefix = self
                .options
                .chair_prefix
                .find(speaker)
                .map_or(false, |m| m.start() == 0);

            if starts_with_prefix {
                let extracted = self
                    .options
                    .chair_prefix
                    .replace_all(speaker, "")
                    .trim()
                    .to_string();
                return (extracted, String::new());
            }
        }
        (chair.to_string(), speaker.to_string())
    }

    /// 讲者拆分（字面量分隔符）
    pub fn split_speakers(&self, speaker: String) -> Speakers {
        if speaker.is_empty() {
            return Speakers::One(speaker);
        }
        match self.options.split_speakers_by.as_deref() {
            Some(delim) => Speakers::Many(
                speaker
                    .split(delim)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            None => Speakers::One(speaker),
        }
    }
}

/// 内容字段全部为空
fn is_blank_session(record: &SessionRecord) -> bool {
    SESSION_CONTENT_FIELDS
        .iter()
        .all(|field| record.text_field(field).trim().is_empty())
}
