// ==========================================
// 会议程序构建器 - 流水线编排器
// ==========================================
// 流程:
//   编译选项 → 逐表（映射 → 构建）→ 赞助商补全 → 校验 → 汇总
// 说明: 全部为内存内同步计算；I/O 只发生在加载与产物写出
// ==========================================

use crate::config::{BuildConfig, CompiledOptions, SheetConfig};
use crate::domain::record::{OutputGroup, PreviewResponse, ProgramData};
use crate::domain::types::SheetType;
use crate::domain::workbook::Workbook;
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::item_builder::ItemBuilder;
use crate::engine::row_id::RowIdAssigner;
use crate::engine::session_builder::SessionBuilder;
use crate::engine::sponsor_enrichment::{SponsorDetection, SponsorEnricher};
use crate::engine::validator::OutputValidator;
use crate::importer::field_mapper::FieldMapper;
use tracing::{debug, info, instrument, warn};

// ==========================================
// BuildOutcome - 构建结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// 无错误：JSON 产物（缩进、UTF-8、保留非 ASCII）
    Ready {
        artifact: String,
        warnings: Vec<String>,
    },
    /// 存在错误：不产出任何数据
    Rejected {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

// ==========================================
// ProgramPipeline
// ==========================================
pub struct ProgramPipeline {
    enricher: SponsorEnricher,
}

impl Default for ProgramPipeline {
    fn default() -> Self {
        Self::new(SponsorDetection::default())
    }
}

impl ProgramPipeline {
    pub fn new(detection: SponsorDetection) -> Self {
        Self {
            enricher: SponsorEnricher::new(detection.detector()),
        }
    }

    pub fn with_enricher(enricher: SponsorEnricher) -> Self {
        Self { enricher }
    }

    /// 预览
    ///
    /// # 错误
    /// - InvalidPattern: 任一表的 Chair 前缀正则非法（在处理任何行之前）
    /// - SheetNotFound: 配置引用的表不在工作簿中
    #[instrument(skip_all, fields(sheets = config.sheets.len()))]
    pub fn preview(&self, workbook: &Workbook, config: &BuildConfig) -> PipelineResult<PreviewResponse> {
        let compiled = compile_all(config)?;

        let mut program_groups = ProgramData::new();
        let mut item_groups = ProgramData::new();
        let mut warnings = Vec::new();

        for (sheet, options) in config.sheets.iter().zip(compiled.iter()) {
            let table = workbook
                .sheet(&sheet.name)
                .ok_or_else(|| PipelineError::SheetNotFound {
                    sheet: sheet.name.clone(),
                })?;

            let canonical = FieldMapper::apply(table, &sheet.mapping, sheet.effective_uid_column());
            let ids = RowIdAssigner::new(sheet.slug.clone(), sheet.effective_uid_column().is_some());

            let group = if sheet.sheet_type.is_program() {
                let sessions = SessionBuilder::new(ids, options).build(&canonical);
                OutputGroup::sessions(sheet.key.clone(), sessions)
            } else {
                let items = ItemBuilder::new(ids, FieldMapper::keep_fields(&sheet.mapping)).build(&canonical);
                OutputGroup::items(sheet.key.clone(), sheet.sheet_type, items)
            };

            if !table.is_empty() && group.records.is_empty() {
                let message = empty_output_warning(sheet);
                warn!(sheet = %sheet.name, key = %sheet.key, "源表非空但未产出记录");
                warnings.push(message);
            }

            debug!(
                sheet = %sheet.name,
                key = %sheet.key,
                sheet_type = %sheet.sheet_type,
                records = group.records.len(),
                "表构建完成"
            );

            if sheet.sheet_type.is_program() {
                program_groups.upsert(group);
            } else {
                item_groups.upsert(group);
            }
        }

        // program 分组在前，同 key 的通用分组原位覆盖
        let mut data = program_groups;
        for group in item_groups.groups().iter().cloned() {
            data.upsert(group);
        }

        self.enricher.enrich(&mut data);

        let report = OutputValidator::validate(&data);
        warnings.extend(report.warnings);

        info!(
            groups = data.len(),
            warnings = warnings.len(),
            errors = report.errors.len(),
            "预览完成"
        );

        Ok(PreviewResponse {
            data,
            warnings,
            errors: report.errors,
        })
    }

    /// 构建：存在任何错误时拒绝，不产出数据
    #[instrument(skip_all, fields(sheets = config.sheets.len()))]
    pub fn build(&self, workbook: &Workbook, config: &BuildConfig) -> PipelineResult<BuildOutcome> {
        let preview = self.preview(workbook, config)?;

        if preview.has_errors() {
            warn!(errors = preview.errors.len(), "存在校验错误，拒绝构建");
            return Ok(BuildOutcome::Rejected {
                errors: preview.errors,
                warnings: preview.warnings,
            });
        }

        let artifact = render_artifact(&preview.data)?;
        Ok(BuildOutcome::Ready {
            artifact,
            warnings: preview.warnings,
        })
    }
}

/// 产物 JSON（缩进输出，serde_json 默认保留非 ASCII 字符）
pub fn render_artifact(data: &ProgramData) -> PipelineResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn compile_all(config: &BuildConfig) -> PipelineResult<Vec<CompiledOptions>> {
    config
        .sheets
        .iter()
        .map(|sheet| {
            sheet.options.compile().map_err(|e| PipelineError::InvalidPattern {
                sheet: sheet.name.clone(),
                pattern: sheet.options.chair_prefix_pattern().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn empty_output_warning(sheet: &SheetConfig) -> String {
    let detail = match sheet.sheet_type {
        SheetType::Program => "No program rows produced — check mapping for time/title/speaker/…",
        SheetType::Faculty => "No faculty rows produced — check mapping (e.g., name, bio, photo).",
        SheetType::Sponsors => "No sponsor rows produced — check mapping (e.g., name, logo, url).",
        SheetType::Custom => "No rows produced for custom type — check mapping.",
    };
    format!("[{}] {}", sheet.key, detail)
}
