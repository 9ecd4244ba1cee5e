// ==========================================
// 会议程序构建器 - 构建配置
// ==========================================
// 职责: 每次预览/构建请求携带的表配置（不持久化）
// 格式: JSON（serde），缺省字段按默认值补齐
// ==========================================

use crate::config::ConfigError;
use crate::domain::record::SheetSummary;
use crate::domain::types::{IdStrategy, SheetType};
use crate::importer::data_cleaner::slugify;
use crate::importer::field_mapper::ColumnMapping;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认 Chair 前缀：可选前导空白 + "chair" + 可选冒号
pub const DEFAULT_CHAIR_PREFIX_REGEX: &str = r"^\s*chair:?\s*";

fn default_true() -> bool {
    true
}

fn default_chair_prefix() -> Option<String> {
    Some(DEFAULT_CHAIR_PREFIX_REGEX.to_string())
}

// ==========================================
// SheetOptions - 行构建选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetOptions {
    /// 从讲者字段提取 Chair
    #[serde(default = "default_true")]
    pub chair_from_speaker: bool,

    /// Chair 前缀正则（不区分大小写）
    #[serde(default = "default_chair_prefix")]
    pub chair_prefix_regex: Option<String>,

    /// 讲者拆分分隔符（字面量）
    #[serde(default)]
    pub split_speakers_by: Option<String>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            chair_from_speaker: true,
            chair_prefix_regex: default_chair_prefix(),
            split_speakers_by: None,
        }
    }
}

impl SheetOptions {
    /// 生效的 Chair 前缀（空值回退默认）
    pub fn chair_prefix_pattern(&self) -> &str {
        self.chair_prefix_regex
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_CHAIR_PREFIX_REGEX)
    }

    /// 编译选项（每次请求一次）
    pub fn compile(&self) -> Result<CompiledOptions, regex::Error> {
        let chair_prefix = RegexBuilder::new(self.chair_prefix_pattern())
            .case_insensitive(true)
            .build()?;

        Ok(CompiledOptions {
            chair_from_speaker: self.chair_from_speaker,
            chair_prefix,
            split_speakers_by: self.split_speakers_by.clone().filter(|d| !d.is_empty()),
        })
    }
}

/// 已编译的行构建选项
#[derive(Debug, Clone)]
pub struct CompiledOptions {
    pub chair_from_speaker: bool,
    pub chair_prefix: Regex,
    pub split_speakers_by: Option<String>,
}

impl Default for CompiledOptions {
    fn default() -> Self {
        Self {
            chair_from_speaker: true,
            chair_prefix: RegexBuilder::new(DEFAULT_CHAIR_PREFIX_REGEX)
                .case_insensitive(true)
                .build()
                .expect("valid default chair prefix regex"),
            split_speakers_by: None,
        }
    }
}

// ==========================================
// SheetConfig - 单表配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// 工作簿中的表名
    pub name: String,
    /// 输出分组键
    pub key: String,
    /// ID 前缀
    pub slug: String,
    #[serde(default)]
    pub date_label: Option<String>,
    #[serde(default)]
    pub sheet_type: SheetType,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default)]
    pub uid_column: Option<String>,
    #[serde(default)]
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub options: SheetOptions,
}

impl SheetConfig {
    pub fn new(name: impl Into<String>, key: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            slug: slug.into(),
            date_label: None,
            sheet_type: SheetType::Program,
            id_strategy: IdStrategy::SlugIndex,
            uid_column: None,
            mapping: ColumnMapping::new(),
            options: SheetOptions::default(),
        }
    }

    pub fn with_type(mut self, sheet_type: SheetType) -> Self {
        self.sheet_type = sheet_type;
        self
    }

    pub fn with_uid_column(mut self, column: impl Into<String>) -> Self {
        self.id_strategy = IdStrategy::UidColumn;
        self.uid_column = Some(column.into());
        self
    }

    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.mapping.insert(field.into(), Some(column.into()));
        self
    }

    pub fn with_options(mut self, options: SheetOptions) -> Self {
        self.options = options;
        self
    }

    /// uid-column 策略下的唯一 ID 列
    pub fn effective_uid_column(&self) -> Option<&str> {
        match self.id_strategy {
            IdStrategy::UidColumn => self.uid_column.as_deref().filter(|c| !c.trim().is_empty()),
            IdStrategy::SlugIndex => None,
        }
    }
}

// ==========================================
// BuildConfig - 请求级配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    pub sheets: Vec<SheetConfig>,
}

impl BuildConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 根据工作表摘要生成配置骨架（供人工修改）
    ///
    /// # 规则
    /// - 表名以 sponsor/patrocin 开头 → sponsors，faculty/ponente/speaker → faculty
    /// - program 表使用猜测映射，其余表按列名逐列保留
    pub fn from_guess(summaries: &[SheetSummary]) -> Self {
        let sheets = summaries
            .iter()
            .map(|summary| {
                let slug = slugify(&summary.name);
                let key = slug.replace('-', "_");
                let sheet_type = infer_sheet_type(&summary.name);

                let mapping: ColumnMapping = if sheet_type.is_program() {
                    summary
                        .guess
                        .iter()
                        .map(|(field, col)| (field.clone(), Some(col.clone())))
                        .collect()
                } else {
                    summary
                        .columns
                        .iter()
                        .filter_map(|col| {
                            let field = slugify(col).replace('-', "_");
                            (!field.is_empty()).then(|| (field, Some(col.clone())))
                        })
                        .collect()
                };

                SheetConfig {
                    mapping,
                    sheet_type,
                    ..SheetConfig::new(summary.name.clone(), key, slug)
                }
            })
            .collect();

        Self { sheets }
    }
}

fn infer_sheet_type(name: &str) -> SheetType {
    let lower = name.trim().to_lowercase();
    if lower.starts_with("sponsor") || lower.starts_with("patrocin") {
        SheetType::Sponsors
    } else if lower.starts_with("faculty")
        || lower.starts_with("ponente")
        || lower.starts_with("speaker")
    {
        SheetType::Faculty
    } else {
        SheetType::Program
    }
}
