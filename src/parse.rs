use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{AgeBracket, NOT_INFORMED};

/// Missing value tokens, matched exactly (no trimming, case-sensitive)
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "-NaN", "-nan", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

// Day-first date layouts; ISO is unambiguous and accepted as-is
static DATE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // 15/03/1987
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(), "%d/%m/%Y"),
        // 15/03/87
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{2}$").unwrap(), "%d/%m/%y"),
        // 15-03-1987
        (Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap(), "%d-%m-%Y"),
        // 15.03.1987
        (Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").unwrap(), "%d.%m.%Y"),
        // 1987-03-15
        (Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(), "%Y-%m-%d"),
    ]
});

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap());

/// Outcome of converting a raw cell into a typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    Missing,
    /// The cell held something that could not be converted
    Invalid,
}

impl<T> Parsed<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Parsed::Value(v) => Some(v),
            Parsed::Missing | Parsed::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Parsed::Invalid)
    }
}

/// Check if a value represents a missing value
pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Normalise a raw cell: missing tokens become `None`
pub fn normalize_cell(value: &str) -> Option<String> {
    if is_missing(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a day-first date, ignoring a trailing time of day
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (date_part, time_part) = match trimmed.split_once(|c: char| c == ' ' || c == 'T') {
        Some((d, t)) => (d, Some(t.trim())),
        None => (trimmed, None),
    };
    if let Some(time) = time_part {
        if !TIME_PATTERN.is_match(time) {
            return None;
        }
    }

    DATE_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(date_part))
        .find_map(|(_, format)| NaiveDate::parse_from_str(date_part, format).ok())
}

pub fn parse_date_cell(value: Option<&str>) -> Parsed<NaiveDate> {
    match value {
        None => Parsed::Missing,
        Some(raw) => parse_date(raw).map_or(Parsed::Invalid, Parsed::Value),
    }
}

/// An explicit not-informed label counts as missing, not as a failure
pub fn parse_age_bracket_cell(value: Option<&str>) -> Parsed<AgeBracket> {
    match value {
        None => Parsed::Missing,
        Some(raw) if raw.trim() == NOT_INFORMED => Parsed::Missing,
        Some(raw) => AgeBracket::from_label(raw).map_or(Parsed::Invalid, Parsed::Value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing("NA"));
        assert!(is_missing("N/A"));
        assert!(is_missing("NULL"));
        assert!(is_missing("NaN"));
        assert!(!is_missing("na "));
        assert!(!is_missing("0"));
        assert!(!is_missing("MASCULINO"));
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell("NA"), None);
        assert_eq!(normalize_cell("SP"), Some("SP".to_string()));
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("02/04/1986"), Some(ymd(1986, 4, 2)));
        assert_eq!(parse_date("13/04/1986"), Some(ymd(1986, 4, 13)));
        assert_eq!(parse_date("02-04-1986"), Some(ymd(1986, 4, 2)));
        assert_eq!(parse_date("02.04.1986"), Some(ymd(1986, 4, 2)));
    }

    #[test]
    fn test_parse_date_iso_and_time_suffix() {
        assert_eq!(parse_date("1986-04-02"), Some(ymd(1986, 4, 2)));
        assert_eq!(parse_date("02/04/1986 14:30:00"), Some(ymd(1986, 4, 2)));
        assert_eq!(parse_date("1986-04-02T08:15"), Some(ymd(1986, 4, 2)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("ontem"), None);
        assert_eq!(parse_date("31/02/1986"), None);
        assert_eq!(parse_date("02/13/1986"), None);
        assert_eq!(parse_date("02/04/1986 tarde"), None);
    }

    #[test]
    fn test_parse_date_cell_outcomes() {
        assert_eq!(parse_date_cell(None), Parsed::Missing);
        assert!(parse_date_cell(Some("xx/yy/zzzz")).is_invalid());
        assert_eq!(
            parse_date_cell(Some("01/05/1986")).into_option(),
            Some(ymd(1986, 5, 1))
        );
    }

    #[test]
    fn test_parse_age_bracket_cell() {
        assert_eq!(
            parse_age_bracket_cell(Some("20 A 24 ANOS")),
            Parsed::Value(AgeBracket::From20To24)
        );
        assert_eq!(parse_age_bracket_cell(Some(NOT_INFORMED)), Parsed::Missing);
        assert_eq!(parse_age_bracket_cell(None), Parsed::Missing);
        assert!(parse_age_bracket_cell(Some("IDOSO")).is_invalid());
    }
}
