// ==========================================
// 会议程序构建器 - 工作簿会话 API
// ==========================================
// 职责: 调用方持有的工作簿句柄 + 预览/构建/重置
// 状态: 至多一个已加载工作簿；重新加载时整体替换（不合并）
// 资源: 上传/下载的临时文件随工作簿替换或重置删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::BuildConfig;
use crate::domain::record::{PreviewResponse, SheetSummary};
use crate::domain::workbook::Workbook;
use crate::engine::orchestrator::{BuildOutcome, ProgramPipeline};
use crate::importer::column_guesser::ColumnGuesser;
use crate::importer::workbook_source::{LoadedWorkbook, WorkbookSource};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

// ==========================================
// BuildReport - 构建请求结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildReport {
    /// 产物已写出
    Written { path: PathBuf, warnings: Vec<String> },
    /// 存在错误，未写出任何文件
    Rejected {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

// ==========================================
// WorkbookSession
// ==========================================

pub struct WorkbookSession {
    pipeline: ProgramPipeline,
    current: Option<LoadedWorkbook>,
}

impl Default for WorkbookSession {
    fn default() -> Self {
        Self::new(ProgramPipeline::default())
    }
}

impl WorkbookSession {
    pub fn new(pipeline: ProgramPipeline) -> Self {
        Self {
            pipeline,
            current: None,
        }
    }

    /// 加载工作簿并整体替换当前工作簿
    ///
    /// 加载失败时保留原工作簿
    ///
    /// # 返回
    /// - 每个表的列名与猜测映射
    pub async fn load(&mut self, source: &dyn WorkbookSource) -> ApiResult<Vec<SheetSummary>> {
        let loaded = source.load().await?;
        let summaries = summarize(&loaded.workbook);

        info!(
            origin = ?loaded.origin,
            sheets = summaries.len(),
            "工作簿已加载"
        );

        // 旧工作簿（及其临时文件）在此处释放
        self.current = Some(loaded);
        Ok(summaries)
    }

    /// 当前工作簿的表摘要（未加载时为空）
    pub fn sheets(&self) -> Vec<SheetSummary> {
        self.current
            .as_ref()
            .map(|loaded| summarize(&loaded.workbook))
            .unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn loaded(&self) -> Option<&LoadedWorkbook> {
        self.current.as_ref()
    }

    fn workbook(&self) -> ApiResult<&Workbook> {
        self.current
            .as_ref()
            .map(|loaded| &loaded.workbook)
            .ok_or(ApiError::NoWorkbook)
    }

    pub fn preview(&self, config: &BuildConfig) -> ApiResult<PreviewResponse> {
        let workbook = self.workbook()?;
        Ok(self.pipeline.preview(workbook, config)?)
    }

    /// 构建并写出产物
    ///
    /// 存在任何行级错误时不写文件，返回 Rejected
    #[instrument(skip(self, config), fields(out = %out_path.display()))]
    pub fn build(&self, config: &BuildConfig, out_path: &Path) -> ApiResult<BuildReport> {
        let workbook = self.workbook()?;

        match self.pipeline.build(workbook, config)? {
            BuildOutcome::Ready { artifact, warnings } => {
                write_artifact(out_path, &artifact)?;
                info!(warnings = warnings.len(), "产物已写出");
                Ok(BuildReport::Written {
                    path: out_path.to_path_buf(),
                    warnings,
                })
            }
            BuildOutcome::Rejected { errors, warnings } => Ok(BuildReport::Rejected { errors, warnings }),
        }
    }

    /// 清空工作簿并删除临时文件
    ///
    /// # 返回
    /// - 是否存在被清除的工作簿
    pub fn reset(&mut self) -> bool {
        match self.current.take() {
            Some(loaded) => {
                info!(origin = ?loaded.origin, "工作簿已重置");
                true
            }
            None => false,
        }
    }
}

/// 表摘要：列名 + 猜测映射
pub fn summarize(workbook: &Workbook) -> Vec<SheetSummary> {
    workbook
        .sheets()
        .iter()
        .map(|table| SheetSummary {
            name: table.name.clone(),
            columns: table.columns.clone(),
            guess: ColumnGuesser::guess(&table.columns),
        })
        .collect()
}

/// 原子写出：同目录临时文件 → persist
pub fn write_artifact(path: &Path, contents: &str) -> ApiResult<()> {
    let output_error = |message: String| ApiError::OutputWrite {
        path: path.display().to_string(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| output_error(e.to_string()))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| output_error(e.to_string()))?;

    tmp.persist(path).map_err(|e| {
        warn!(path = %path.display(), error = %e.error, "产物写出失败");
        output_error(e.error.to_string())
    })?;
    Ok(())
}
