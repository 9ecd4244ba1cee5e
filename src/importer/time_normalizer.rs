// ==========================================
// 会议程序构建器 - 时间规范化
// ==========================================
// 职责: 异构时间文本 → "HH:MM" 或 "HH:MM - HH:MM"
// 说明: 无法识别的输入降级为 ""，由校验器决定是否告警
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

// 完整的 H:MM / HH:MM
static WHOLE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("valid whole time regex"));

// 时间片段，允许 ':' '.' '-' 'h' 作分隔符
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2})\s*[:.\-h]\s*([0-9]{2})").expect("valid time token regex")
});

// 日期时间单元格文本的日期部分（YYYY-MM-DD 后接空格 / 'T' / 结尾）
static DATE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(?:[ T]+|$)").expect("valid date prefix regex")
});

// 无分隔符的 HMM / HHMM
static BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})([0-9]{2})$").expect("valid bare time regex"));

pub struct TimeNormalizer;

impl TimeNormalizer {
    /// 规范化时间文本
    ///
    /// # 规则
    /// 1. trim；空或 "nan" → ""
    /// 2. 去掉开头的 YYYY-MM-DD 日期（仅保留时间部分）
    /// 3. en/em dash → '-'
    /// 4. 整体为 H:MM → 补零返回
    /// 5. 否则取前两个时间片段
    /// 6. 无片段时尝试 HMM / HHMM
    /// 7. 一个片段原样返回，两个以 " - " 连接
    pub fn normalize(raw: &str) -> String {
        let s = raw.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("nan") {
            return String::new();
        }

        let s = DATE_PREFIX_RE.replace(s, "");
        let s = s.replace(['\u{2013}', '\u{2014}'], "-");

        if let Some(caps) = WHOLE_TIME_RE.captures(&s) {
            return pad(&caps[1], &caps[2]);
        }

        let tokens: Vec<String> = TOKEN_RE
            .captures_iter(&s)
            .take(2)
            .map(|caps| pad(&caps[1], &caps[2]))
            .collect();

        match tokens.as_slice() {
            [] => match BARE_RE.captures(&s) {
                Some(caps) => pad(&caps[1], &caps[2]),
                None => String::new(),
            },
            [single] => single.clone(),
            [start, end, ..] => format!("{} - {}", start, end),
        }
    }
}

/// 小时补零
fn pad(hour: &str, minute: &str) -> String {
    match hour.parse::<u32>() {
        Ok(h) => format!("{:02}:{}", h, minute),
        Err(_) => format!("{}:{}", hour, minute),
    }
}

/// 便捷函数，见 [`TimeNormalizer::normalize`]
pub fn normalize_time(raw: &str) -> String {
    TimeNormalizer::normalize(raw)
}
