// ==========================================
// 会议程序构建器 - 工作簿与原始表
// ==========================================
// 职责: 承载解析后的原始单元格（未映射、未清洗）
// 说明: 空白行保留，保证行号（slug-index）稳定
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

// ==========================================
// CellValue - 原始单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    /// 转为文本（未 trim）
    ///
    /// # 规则
    /// - 空 / NaN / 错误单元格 → ""
    /// - 整数值浮点数不带小数部分（3.0 → "3"）
    /// - 时间 → HH:MM:SS，日期时间 → YYYY-MM-DD HH:MM:SS
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty | CellValue::Error(_) => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_nan() || f.is_infinite() {
                    String::new()
                } else if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            CellValue::Time(t) => t.format("%H:%M:%S").to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 是否为空值（空 / NaN / 纯空白文本）
    pub fn is_blank(&self) -> bool {
        self.to_text().trim().is_empty()
    }

    /// 表格日期序列值 → 时间/日期时间
    ///
    /// 序列值 < 1 视为纯时间（Excel 仅含时间的单元格）
    pub fn from_serial(serial: f64) -> CellValue {
        if serial.is_nan() || serial < 0.0 {
            return CellValue::Empty;
        }

        let days = serial.trunc() as i64;
        let mut seconds = (serial.fract() * 86_400.0).round() as i64;
        let mut day_offset = days;
        if seconds >= 86_400 {
            seconds -= 86_400;
            day_offset += 1;
        }

        let time = match NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0) {
            Some(t) => t,
            None => return CellValue::Float(serial),
        };

        if days == 0 {
            return CellValue::Time(time);
        }

        // Excel 纪元（含 1900 闰年偏差）
        let epoch = match NaiveDate::from_ymd_opt(1899, 12, 30) {
            Some(d) => d,
            None => return CellValue::Float(serial),
        };
        match epoch.checked_add_signed(Duration::days(day_offset)) {
            Some(date) => CellValue::DateTime(date.and_time(time)),
            None => CellValue::Float(serial),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// RawTable - 原始表（一个工作表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// 数据行数（不含表头）
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 解析列名
    ///
    /// 先精确匹配，再按 trim 后匹配；空列名视为未映射
    pub fn resolve_column(&self, column: &str) -> Option<usize> {
        if column.is_empty() {
            return None;
        }
        if let Some(idx) = self.columns.iter().position(|c| c == column) {
            return Some(idx);
        }
        let wanted = column.trim();
        self.columns.iter().position(|c| c.trim() == wanted)
    }

    /// 读取单元格（越界返回空单元格）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

// ==========================================
// Workbook - 一次上传/下载得到的全部工作表
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<RawTable>,
}

impl Workbook {
    pub fn new(sheets: Vec<RawTable>) -> Self {
        Self { sheets }
    }

    /// 按名称查找工作表（精确匹配）
    pub fn sheet(&self, name: &str) -> Option<&RawTable> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheets(&self) -> &[RawTable] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_text() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Float(f64::NAN).to_text(), "");
        assert_eq!(CellValue::Float(3.0).to_text(), "3");
        assert_eq!(CellValue::Float(2.5).to_text(), "2.5");
        assert_eq!(CellValue::Int(42).to_text(), "42");
        assert_eq!(CellValue::Bool(true).to_text(), "True");
        assert_eq!(CellValue::Error("#N/A".to_string()).to_text(), "");
    }

    #[test]
    fn test_from_serial_time_only() {
        // 0.4375 天 = 10:30
        let cell = CellValue::from_serial(0.4375);
        assert_eq!(cell.to_text(), "10:30:00");
    }

    #[test]
    fn test_from_serial_datetime() {
        // 45581.5 = 2024-10-16 12:00
        let cell = CellValue::from_serial(45581.5);
        assert_eq!(cell.to_text(), "2024-10-16 12:00:00");
    }

    #[test]
    fn test_resolve_column_trimmed() {
        let table = RawTable::new(
            "Day 1",
            vec!["Hora".to_string(), " Tema ".to_string()],
            vec![],
        );
        assert_eq!(table.resolve_column("Hora"), Some(0));
        assert_eq!(table.resolve_column("Tema"), Some(1));
        assert_eq!(table.resolve_column("Ponente"), None);
        assert_eq!(table.resolve_column(""), None);
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let table = RawTable::new("s", vec!["a".to_string()], vec![vec![]]);
        assert_eq!(table.cell(0, 0), &CellValue::Empty);
        assert_eq!(table.cell(5, 5), &CellValue::Empty);
    }

    #[test]
    fn test_workbook_lookup() {
        let wb = Workbook::new(vec![
            RawTable::new("Oct 16", vec![], vec![]),
            RawTable::new("Sponsors", vec![], vec![]),
        ]);
        assert!(wb.sheet("Sponsors").is_some());
        assert!(wb.sheet("sponsors").is_none());
        assert_eq!(wb.sheet_names(), vec!["Oct 16", "Sponsors"]);
    }
}
