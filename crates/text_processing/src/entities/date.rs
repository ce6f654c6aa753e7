//! Date resolution
//!
//! Absolute `YYYY-M-D` patterns (separators `.`, `/`, `-`) win over relative
//! keywords, which win over the caller hint. Impossible calendar dates such
//! as 2023-02-30 are treated as "no match" and fall through.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cascade::Cascade;
use crate::numerals::normalize_fullwidth_digits;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})[./-]([0-9]{1,2})[./-]([0-9]{1,2})").unwrap());

/// Relative day keywords and their offset from today
pub const RELATIVE_DATE_KEYWORDS: &[(&str, i64)] = &[
    ("今天", 0),
    ("今日", 0),
    ("昨天", -1),
    ("昨日", -1),
    ("前天", -2),
    ("明天", 1),
    ("后天", 2),
];

/// Build a date, rejecting impossible combinations
pub fn safe_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First absolute date pattern in the text, if it is a real calendar date
pub fn absolute_date(text: &str) -> Option<NaiveDate> {
    let normalized = normalize_fullwidth_digits(text);
    let caps = DATE_PATTERN.captures(&normalized)?;

    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;

    let date = safe_date(year, month, day);
    if date.is_none() {
        tracing::debug!(matched = &caps[0], "Discarding invalid calendar date");
    }
    date
}

/// Offset `today` by the first relative keyword found
pub fn relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    RELATIVE_DATE_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .and_then(|(_, offset)| today.checked_add_signed(Duration::days(*offset)))
}

/// Interpret a loosely formatted date value
///
/// Tries the leading 10 characters as ISO-8601 first (so timestamps work),
/// then the absolute pattern anywhere in the string.
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let head: String = trimmed.chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d")
        .ok()
        .or_else(|| absolute_date(trimmed))
}

/// Resolve the date an expense occurred on from the text
pub fn resolve_date(text: &str, hint: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    Cascade::new("date")
        .step("absolute", || absolute_date(text))
        .step("relative", || relative_date(text, today))
        .step("hint", || hint)
        .resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_absolute_separators() {
        assert_eq!(absolute_date("2024-03-01 午餐"), Some(ymd(2024, 3, 1)));
        assert_eq!(absolute_date("2024/3/1"), Some(ymd(2024, 3, 1)));
        assert_eq!(absolute_date("2024.12.31"), Some(ymd(2024, 12, 31)));
        assert!(absolute_date("3/1").is_none());
    }

    #[test]
    fn test_invalid_date_falls_through() {
        assert!(absolute_date("2023-02-30").is_none());
        assert_eq!(
            resolve_date("2023-02-30 昨天吃饭", None, today()),
            Some(ymd(2024, 5, 19))
        );
        let hint = ymd(2024, 1, 1);
        assert_eq!(resolve_date("2023-02-30", Some(hint), today()), Some(hint));
    }

    #[test]
    fn test_relative_keywords() {
        assert_eq!(relative_date("昨天打车", today()), Some(ymd(2024, 5, 19)));
        assert_eq!(relative_date("前天的晚餐", today()), Some(ymd(2024, 5, 18)));
        assert_eq!(relative_date("后天的门票", today()), Some(ymd(2024, 5, 22)));
        assert_eq!(relative_date("今日午餐", today()), Some(today()));
        assert!(relative_date("午餐", today()).is_none());
    }

    #[test]
    fn test_relative_crosses_month() {
        let first = ymd(2024, 3, 1);
        assert_eq!(relative_date("昨天", first), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn test_absolute_beats_relative() {
        assert_eq!(
            resolve_date("今天报销2024-01-15的机票", None, today()),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn test_hint_and_none() {
        let hint = ymd(2024, 4, 1);
        assert_eq!(resolve_date("午餐", Some(hint), today()), Some(hint));
        assert!(resolve_date("午餐", None, today()).is_none());
    }

    #[test]
    fn test_parse_date_value() {
        assert_eq!(parse_date_value("2024-05-01"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_date_value("2024-05-01T10:00:00Z"), Some(ymd(2024, 5, 1)));
        assert_eq!(parse_date_value("大约 2024/5/1"), Some(ymd(2024, 5, 1)));
        assert!(parse_date_value("2024-02-30").is_none());
        assert!(parse_date_value("yesterday").is_none());
        assert!(parse_date_value("").is_none());
    }
}
