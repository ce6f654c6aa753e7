//! Amount extraction
//!
//! Arabic numerals are the stronger signal and always win; Chinese numeral
//! runs are only interpreted when no Arabic amount is present.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::numerals::{normalize_fullwidth_digits, parse_chinese_numeral};

/// Optional minus, digits, optional `.`/`,` fraction
static ARABIC_AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9]+(?:[.,][0-9]+)?").unwrap());

/// Maximal runs of Chinese numeral vocabulary
static NUMERAL_RUN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[零〇一二两三四五六七八九十拾百佰千仟万萬亿億点负負]+").unwrap());

/// Extract a signed amount from free text
pub fn extract_amount(text: &str) -> Option<f64> {
    extract_arabic_amount(text).or_else(|| extract_numeral_amount(text))
}

/// First Arabic-numeral amount, after stripping thousands separators
pub fn extract_arabic_amount(text: &str) -> Option<f64> {
    let normalized = normalize_fullwidth_digits(text);
    let cleaned = strip_thousands_separators(&normalized);

    let found = ARABIC_AMOUNT_PATTERN.find(&cleaned)?;
    let value = found.as_str().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// First numeral run that the interpreter accepts
pub fn extract_numeral_amount(text: &str) -> Option<f64> {
    NUMERAL_RUN_PATTERN
        .find_iter(text)
        .find_map(|run| parse_chinese_numeral(run.as_str()))
}

/// Drop commas used as thousands separators
///
/// A comma between a digit and exactly three digits is a grouping separator;
/// any other comma is left for the amount pattern to treat as a decimal mark.
fn strip_thousands_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| !(**c == ',' && is_grouping_comma(&chars, *i)))
        .map(|(_, c)| *c)
        .collect()
}

fn is_grouping_comma(chars: &[char], index: usize) -> bool {
    let digit_before = index > 0 && chars[index - 1].is_ascii_digit();
    let group_after = chars
        .get(index + 1..index + 4)
        .map_or(false, |group| group.iter().all(char::is_ascii_digit));
    let longer_run = chars.get(index + 4).map_or(false, char::is_ascii_digit);
    digit_before && group_after && !longer_run
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_separator() {
        assert_eq!(extract_amount("花了1,200.50元"), Some(1200.5));
        assert_eq!(extract_amount("共计1,234,567元"), Some(1_234_567.0));
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(extract_amount("12,5 欧元"), Some(12.5));
    }

    #[test]
    fn test_arabic_precedence() {
        // Arabic digits win even when numeral text comes first
        assert_eq!(extract_amount("三杯咖啡一共45元"), Some(45.0));
    }

    #[test]
    fn test_numeral_fallback() {
        assert_eq!(extract_amount("打车花了三十五块"), Some(35.0));
        assert_eq!(extract_amount("房费两千三百元"), Some(2300.0));
        assert_eq!(extract_amount("门票一百二十点五"), Some(120.5));
    }

    #[test]
    fn test_sign_preserved() {
        assert_eq!(extract_amount("退款-20元"), Some(-20.0));
        assert_eq!(extract_amount("负五十"), Some(-50.0));
    }

    #[test]
    fn test_fullwidth_digits() {
        assert_eq!(extract_amount("午餐８８元"), Some(88.0));
    }

    #[test]
    fn test_no_amount() {
        assert!(extract_amount("备注").is_none());
        assert!(extract_amount("").is_none());
    }

    #[test]
    fn test_strip_thousands_separators() {
        assert_eq!(strip_thousands_separators("1,200.50"), "1200.50");
        assert_eq!(strip_thousands_separators("1,5"), "1,5");
        assert_eq!(strip_thousands_separators("1,000,000"), "1000000");
    }
}
