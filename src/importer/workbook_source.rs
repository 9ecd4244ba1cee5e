// ==========================================
// 会议程序构建器 - 工作簿来源
// ==========================================
// 职责: 本地文件 / 上传字节 / Google Sheets 导出 → LoadedWorkbook
// 说明: 上传与下载的落盘文件由 NamedTempFile 持有，
//       工作簿被替换或重置时随之删除
// ==========================================

use crate::domain::workbook::Workbook;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{Builder, NamedTempFile};
use tracing::{info, instrument, warn};

static SHEET_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").expect("valid sheet id regex")
});

/// Google Sheets 导出默认超时
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(45);

// ==========================================
// WorkbookOrigin - 工作簿来源描述
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookOrigin {
    LocalFile(PathBuf),
    Upload { file_name: String },
    GoogleSheet { sheet_id: String },
}

// ==========================================
// LoadedWorkbook - 已加载工作簿 + 落盘文件
// ==========================================
#[derive(Debug)]
pub struct LoadedWorkbook {
    pub workbook: Workbook,
    pub origin: WorkbookOrigin,
    /// 上传/下载产生的临时文件，drop 时删除
    backing_file: Option<NamedTempFile>,
}

impl LoadedWorkbook {
    pub fn new(workbook: Workbook, origin: WorkbookOrigin) -> Self {
        Self {
            workbook,
            origin,
            backing_file: None,
        }
    }

    pub fn with_backing_file(mut self, file: NamedTempFile) -> Self {
        self.backing_file = Some(file);
        self
    }

    /// 临时文件路径（本地文件来源为 None）
    pub fn backing_path(&self) -> Option<&Path> {
        self.backing_file.as_ref().map(|f| f.path())
    }

    /// Google Sheet ID（仅 Google 来源）
    pub fn sheet_id(&self) -> Option<&str> {
        match &self.origin {
            WorkbookOrigin::GoogleSheet { sheet_id } => Some(sheet_id.as_str()),
            _ => None,
        }
    }
}

// ==========================================
// WorkbookSource Trait
// ==========================================
// 实现者: LocalFileSource, UploadSource, GoogleSheetSource
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// 读取并解析工作簿
    async fn load(&self) -> ImportResult<LoadedWorkbook>;
}

// ==========================================
// LocalFileSource - 本地文件（原地解析，不落盘）
// ==========================================
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WorkbookSource for LocalFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> ImportResult<LoadedWorkbook> {
        let path = self.path.clone();
        let workbook = tokio::task::spawn_blocking(move || UniversalFileParser.parse(&path, None))
            .await
            .map_err(|e| ImportError::Other(e.into()))??;

        Ok(LoadedWorkbook::new(
            workbook,
            WorkbookOrigin::LocalFile(self.path.clone()),
        ))
    }
}

// ==========================================
// UploadSource - 上传的文件字节
// ==========================================
pub struct UploadSource {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 扩展名（缺省 .xlsx）
    fn suffix(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".xlsx".to_string())
    }
}

#[async_trait]
impl WorkbookSource for UploadSource {
    #[instrument(skip(self), fields(file_name = %self.file_name, size = self.bytes.len()))]
    async fn load(&self) -> ImportResult<LoadedWorkbook> {
        let tmp = write_temp_file("_uploaded_", &self.suffix(), &self.bytes)?;
        let display_name = Path::new(&self.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file_name)
            .to_string();

        let path = tmp.path().to_path_buf();
        let workbook = tokio::task::spawn_blocking(move || {
            UniversalFileParser.parse(&path, Some(display_name.as_str()))
        })
        .await
        .map_err(|e| ImportError::Other(e.into()))??;

        info!(sheets = workbook.len(), "上传文件解析完成");
        Ok(LoadedWorkbook::new(
            workbook,
            WorkbookOrigin::Upload {
                file_name: self.file_name.clone(),
            },
        )
        .with_backing_file(tmp))
    }
}

// ==========================================
// GoogleSheetSource - Google Sheets XLSX 导出
// ==========================================
pub struct GoogleSheetSource {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GoogleSheetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 从分享链接中提取 Sheet ID
    pub fn parse_sheet_id(url: &str) -> Option<String> {
        SHEET_ID_RE
            .captures(url)
            .map(|caps| caps[1].to_string())
    }

    /// XLSX 导出地址
    pub fn export_url(sheet_id: &str) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=xlsx",
            sheet_id
        )
    }
}

#[async_trait]
impl WorkbookSource for GoogleSheetSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> ImportResult<LoadedWorkbook> {
        let sheet_id = Self::parse_sheet_id(&self.url)
            .ok_or_else(|| ImportError::InvalidSheetUrl(self.url.clone()))?;

        // 单次请求，不重试
        let resp = self
            .client
            .get(Self::export_url(&sheet_id))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            warn!(sheet_id = %sheet_id, "Google Sheets 拒绝访问（403）");
            return Err(ImportError::AccessDenied { sheet_id });
        }
        if !status.is_success() {
            return Err(ImportError::DownloadError(format!("HTTP {}", status)));
        }

        let bytes = resp.bytes().await?;
        let tmp = write_temp_file("_gsheet_", ".xlsx", &bytes)?;
        let path = tmp.path().to_path_buf();
        let workbook = tokio::task::spawn_blocking(move || UniversalFileParser.parse(&path, None))
            .await
            .map_err(|e| ImportError::Other(e.into()))??;

        info!(sheet_id = %sheet_id, sheets = workbook.len(), "Google Sheets 下载完成");
        Ok(LoadedWorkbook::new(workbook, WorkbookOrigin::GoogleSheet { sheet_id }).with_backing_file(tmp))
    }
}

/// 写入临时文件（保留扩展名以便按格式解析）
fn write_temp_file(prefix: &str, suffix: &str, bytes: &[u8]) -> ImportResult<NamedTempFile> {
    let mut tmp = Builder::new().prefix(prefix).suffix(suffix).tempfile()?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    Ok(tmp)
}
