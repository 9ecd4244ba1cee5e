// ==========================================
// 会议程序构建器 - 导入层
// ==========================================
// 职责: 外部表格 → 原始表 → 标准字段表
// 支持: Excel, ODS, CSV, Google Sheets 导出
// ==========================================

// 模块声明
pub mod column_guesser;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod time_normalizer;
pub mod workbook_source;

// 重导出核心类型
pub use column_guesser::{guess_columns, ColumnGuesser};
pub use data_cleaner::{clean_str, slugify, DataCleaner};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{apply_mapping, CanonicalRow, CanonicalTable, ColumnMapping, FieldMapper};
pub use file_parser::{load_spreadsheet, CsvParser, ExcelParser, UniversalFileParser};
pub use time_normalizer::{normalize_time, TimeNormalizer};
pub use workbook_source::{
    GoogleSheetSource, LoadedWorkbook, LocalFileSource, UploadSource, WorkbookOrigin,
    WorkbookSource,
};
