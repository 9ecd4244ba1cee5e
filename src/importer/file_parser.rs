// ==========================================
// 会议程序构建器 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xlsb/.xls) / ODS / CSV
// 说明: 读取全部工作表；空白行保留以保证行号稳定
// ==========================================

use crate::domain::workbook::{CellValue, RawTable, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// 支持的表格扩展名
pub const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ==========================================
// 表头规范化
// ==========================================

/// 空表头 → "Unnamed: {n}"，重复表头 → "name.1" / "name.2"
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 为单表工作簿
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet_name: 表名（通常为文件名）
    pub fn parse(&self, file_path: &Path, sheet_name: &str) -> ImportResult<Workbook> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers = normalize_headers(reader.headers()?.iter().map(|h| h.to_string()).collect());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record.iter().map(CellValue::from).collect();
            rows.push(row);
        }

        debug!(sheet = %sheet_name, columns = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(Workbook::new(vec![RawTable::new(sheet_name, headers, rows)]))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 解析表格文件的全部工作表
    pub fn parse(&self, file_path: &Path) -> ImportResult<Workbook> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();

        let mut tables = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            let mut rows_iter = range.rows();

            // 第一行为表头；空表只保留表名
            let headers = match rows_iter.next() {
                Some(header_row) => {
                    normalize_headers(header_row.iter().map(|c| convert_cell(c).to_text()).collect())
                }
                None => Vec::new(),
            };

            let rows: Vec<Vec<CellValue>> = rows_iter
                .map(|row| row.iter().map(convert_cell).collect())
                .collect();

            debug!(sheet = %name, columns = headers.len(), rows = rows.len(), "工作表解析完成");
            tables.push(RawTable::new(name, headers, rows));
        }

        Ok(Workbook::new(tables))
    }
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::from_serial(dt.as_f64()),
        Data::DateTimeIso(s) => convert_iso_datetime(s),
        Data::DurationIso(s) => convert_iso_duration(s),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// ODS 日期时间文本（2024-10-16T10:00:00 / 2024-10-16 / 10:00:00）
fn convert_iso_datetime(s: &str) -> CellValue {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return CellValue::DateTime(dt);
    }
    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return CellValue::DateTime(dt);
    }
    match NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
        Ok(t) => CellValue::Time(t),
        Err(_) => CellValue::from(s),
    }
}

/// ODS 时间单元格以 ISO 8601 时长给出（PT10H30M00S）
///
/// 超过一天的时长不是钟点，保留原文
fn convert_iso_duration(s: &str) -> CellValue {
    match NaiveTime::parse_from_str(s.trim(), "PT%HH%MM%S%.fS") {
        Ok(t) => CellValue::Time(t),
        Err(_) => CellValue::from(s),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解析文件
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - display_name: CSV 表名（缺省使用文件名）
    pub fn parse<P: AsRef<Path>>(&self, file_path: P, display_name: Option<&str>) -> ImportResult<Workbook> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let workbook = match ext.as_str() {
            "csv" => {
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("sheet.csv");
                CsvParser.parse(path, display_name.unwrap_or(file_name))?
            }
            e if SPREADSHEET_EXTENSIONS.contains(&e) => ExcelParser.parse(path)?,
            _ => return Err(ImportError::UnsupportedFormat(format!(".{}", ext))),
        };

        info!(path = %path.display(), sheets = workbook.len(), "工作簿加载完成");
        Ok(workbook)
    }
}

/// 便捷函数，见 [`UniversalFileParser::parse`]
pub fn load_spreadsheet<P: AsRef<Path>>(path: P) -> ImportResult<Workbook> {
    UniversalFileParser.parse(path, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Hora,Tema,Ponente").unwrap();
        writeln!(temp_file, "9:00,Opening,Dr. A").unwrap();
        writeln!(temp_file, "10:00,Talk B,Dr. B").unwrap();

        let wb = load_spreadsheet(temp_file.path()).unwrap();
        assert_eq!(wb.len(), 1);

        let sheet = &wb.sheets()[0];
        assert_eq!(sheet.columns, vec!["Hora", "Tema", "Ponente"]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.cell(0, 1).to_text(), "Opening");
    }

    #[test]
    fn test_csv_parser_keeps_blank_rows() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Hora,Tema").unwrap();
        writeln!(temp_file, "9:00,Opening").unwrap();
        writeln!(temp_file, ",").unwrap();
        writeln!(temp_file, "10:00,Talk").unwrap();

        let wb = load_spreadsheet(temp_file.path()).unwrap();
        let sheet = &wb.sheets()[0];

        // 空白行保留，行号稳定
        assert_eq!(sheet.len(), 3);
        assert!(sheet.cell(1, 0).is_blank());
        assert_eq!(sheet.cell(2, 1).to_text(), "Talk");
    }

    #[test]
    fn test_csv_sheet_named_after_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "a").unwrap();

        let expected = temp_file
            .path()
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let wb = load_spreadsheet(temp_file.path()).unwrap();
        assert!(wb.sheet(&expected).is_some());

        let wb = UniversalFileParser
            .parse(temp_file.path(), Some("program.csv"))
            .unwrap();
        assert!(wb.sheet("program.csv").is_some());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = load_spreadsheet(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_file_not_found() {
        let result = load_spreadsheet("non_existent.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_ods_duration_cell_becomes_time() {
        let cell = convert_cell(&Data::DurationIso("PT10H30M00S".to_string()));
        assert_eq!(cell, CellValue::Time(NaiveTime::from_hms_opt(10, 30, 0).unwrap()));
        assert_eq!(cell.to_text(), "10:30:00");

        let cell = convert_cell(&Data::DurationIso("PT09H05M00.000S".to_string()));
        assert_eq!(cell.to_text(), "09:05:00");

        // 超过 24 小时保留原文
        let cell = convert_cell(&Data::DurationIso("PT36H00M00S".to_string()));
        assert_eq!(cell, CellValue::Text("PT36H00M00S".to_string()));
    }

    #[test]
    fn test_ods_datetime_cell_becomes_datetime() {
        let cell = convert_cell(&Data::DateTimeIso("2024-10-16T10:00:00".to_string()));
        assert_eq!(cell.to_text(), "2024-10-16 10:00:00");
        assert!(matches!(cell, CellValue::DateTime(_)));

        let cell = convert_cell(&Data::DateTimeIso("2024-10-16".to_string()));
        assert_eq!(cell.to_text(), "2024-10-16 00:00:00");

        let cell = convert_cell(&Data::DateTimeIso("08:15:00".to_string()));
        assert_eq!(cell, CellValue::Time(NaiveTime::from_hms_opt(8, 15, 0).unwrap()));
    }

    #[test]
    fn test_normalize_headers() {
        let headers = normalize_headers(vec![
            "Name".to_string(),
            "".to_string(),
            "Name".to_string(),
            "Name".to_string(),
        ]);
        assert_eq!(headers, vec!["Name", "Unnamed: 1", "Name.1", "Name.2"]);
    }
}
