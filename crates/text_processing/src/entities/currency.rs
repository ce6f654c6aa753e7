//! Currency resolution
//!
//! Candidates are gathered in confidence order and the first one that
//! normalizes to a 3-letter code wins:
//!
//! 1. currency supplied by the completion collaborator
//! 2. currency symbol in the text
//! 3. currency keyword in the text
//! 4. bare uppercase ISO token in the text
//! 5. caller hint

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cascade::Cascade;

/// Literal currency symbols, in precedence order for equal-length matches
pub const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("¥", "CNY"),
    ("￥", "CNY"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("HK$", "HKD"),
];

/// Currency names and codes (lowercase), in precedence order for equal-length matches
pub const CURRENCY_KEYWORDS: &[(&str, &str)] = &[
    ("人民币", "CNY"),
    ("元", "CNY"),
    ("块", "CNY"),
    ("rmb", "CNY"),
    ("cny", "CNY"),
    ("美元", "USD"),
    ("美金", "USD"),
    ("usd", "USD"),
    ("日元", "JPY"),
    ("jpy", "JPY"),
    ("欧元", "EUR"),
    ("eur", "EUR"),
    ("英镑", "GBP"),
    ("gbp", "GBP"),
    ("港币", "HKD"),
    ("港元", "HKD"),
    ("hkd", "HKD"),
    ("台币", "TWD"),
    ("新台币", "TWD"),
    ("twd", "TWD"),
    ("新加坡元", "SGD"),
    ("sgd", "SGD"),
    ("澳元", "AUD"),
    ("aud", "AUD"),
];

/// Three uppercase ASCII letters not embedded in a longer Latin/digit word
static ISO_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^A-Za-z0-9])([A-Z]{3})(?:[^A-Za-z0-9]|$)").unwrap());

/// Longest table entry contained in `haystack`
///
/// "美元" must beat "元" and "HK$" must beat "$"; among equal lengths the
/// earlier table entry wins.
fn longest_contained(table: &[(&str, &'static str)], haystack: &str) -> Option<&'static str> {
    let mut best: Option<(usize, &'static str)> = None;
    for (needle, code) in table {
        if needle.is_empty() || !haystack.contains(needle) {
            continue;
        }
        let len = needle.chars().count();
        if best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, *code));
        }
    }
    best.map(|(_, code)| code)
}

fn keyword_code(keyword: &str) -> Option<&'static str> {
    CURRENCY_KEYWORDS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, code)| *code)
}

/// Normalize an arbitrary candidate to an uppercase 3-letter code
///
/// Exact keyword match (lowercased, then uppercased), then any 3-letter
/// alphabetic token, then keyword containment. Everything else is rejected.
pub fn normalize_currency_code(value: &str) -> Option<String> {
    let candidate = value.trim();
    if candidate.is_empty() {
        return None;
    }

    let lowered = candidate.to_lowercase();
    if let Some(code) = keyword_code(&lowered) {
        return Some(code.to_string());
    }

    let upper = candidate.to_uppercase();
    if let Some(code) = keyword_code(&upper) {
        return Some(code.to_string());
    }

    if upper.chars().count() == 3 && upper.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(upper);
    }

    longest_contained(CURRENCY_KEYWORDS, &lowered).map(str::to_string)
}

/// Code for a currency symbol appearing in the text
pub fn currency_from_symbol(text: &str) -> Option<&'static str> {
    longest_contained(CURRENCY_SYMBOLS, text)
}

/// Code for a currency keyword appearing in the lowercased text
pub fn currency_from_keyword(text: &str) -> Option<&'static str> {
    longest_contained(CURRENCY_KEYWORDS, &text.to_lowercase())
}

/// First standalone uppercase 3-letter token
pub fn currency_from_iso_token(text: &str) -> Option<&str> {
    ISO_TOKEN_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|token| token.as_str())
}

/// Resolve the expense currency
///
/// `external` comes from the completion collaborator, `hint` from the caller.
pub fn resolve_currency(text: &str, external: Option<&str>, hint: Option<&str>) -> Option<String> {
    Cascade::new("currency")
        .step("external", || external.and_then(normalize_currency_code))
        .step("symbol", || currency_from_symbol(text).and_then(normalize_currency_code))
        .step("keyword", || currency_from_keyword(text).and_then(normalize_currency_code))
        .step("iso_token", || currency_from_iso_token(text).and_then(normalize_currency_code))
        .step("hint", || hint.and_then(normalize_currency_code))
        .resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keywords() {
        assert_eq!(normalize_currency_code("人民币").as_deref(), Some("CNY"));
        assert_eq!(normalize_currency_code(" usd ").as_deref(), Some("USD"));
        assert_eq!(normalize_currency_code("RMB").as_deref(), Some("CNY"));
        assert_eq!(normalize_currency_code("美金").as_deref(), Some("USD"));
    }

    #[test]
    fn test_normalize_iso_verbatim() {
        assert_eq!(normalize_currency_code("XYZ").as_deref(), Some("XYZ"));
        assert_eq!(normalize_currency_code("thb").as_deref(), Some("THB"));
    }

    #[test]
    fn test_normalize_substring() {
        assert_eq!(normalize_currency_code("大概100港元").as_deref(), Some("HKD"));
        assert_eq!(normalize_currency_code("新加坡元现金").as_deref(), Some("SGD"));
        assert_eq!(normalize_currency_code("Euros").as_deref(), Some("EUR"));
    }

    #[test]
    fn test_normalize_rejects() {
        assert!(normalize_currency_code("").is_none());
        assert!(normalize_currency_code("   ").is_none());
        assert!(normalize_currency_code("dollars").is_none());
        assert!(normalize_currency_code("12").is_none());
    }

    #[test]
    fn test_longest_symbol_wins() {
        assert_eq!(currency_from_symbol("HK$120"), Some("HKD"));
        assert_eq!(currency_from_symbol("$30"), Some("USD"));
        assert_eq!(currency_from_symbol("￥88"), Some("CNY"));
        assert!(currency_from_symbol("30").is_none());
    }

    #[test]
    fn test_longest_keyword_wins() {
        assert_eq!(currency_from_keyword("花了20美元"), Some("USD"));
        assert_eq!(currency_from_keyword("500日元的饮料"), Some("JPY"));
        assert_eq!(currency_from_keyword("打车35块"), Some("CNY"));
        assert_eq!(currency_from_keyword("paid 20 USD"), Some("USD"));
    }

    #[test]
    fn test_iso_token() {
        assert_eq!(currency_from_iso_token("花了30 XYZ"), Some("XYZ"));
        assert_eq!(currency_from_iso_token("午餐THB三百"), Some("THB"));
        assert!(currency_from_iso_token("ABCD").is_none());
        assert!(currency_from_iso_token("Lunch").is_none());
    }

    #[test]
    fn test_symbol_beats_hint() {
        assert_eq!(resolve_currency("$30", None, Some("EUR")).as_deref(), Some("USD"));
    }

    #[test]
    fn test_external_beats_text() {
        assert_eq!(
            resolve_currency("$30", Some("jpy"), Some("EUR")).as_deref(),
            Some("JPY")
        );
    }

    #[test]
    fn test_invalid_external_falls_through() {
        assert_eq!(
            resolve_currency("打车35块", Some("unknown money"), None).as_deref(),
            Some("CNY")
        );
    }

    #[test]
    fn test_hint_fallback() {
        assert_eq!(resolve_currency("午餐", None, Some("欧元")).as_deref(), Some("EUR"));
        assert!(resolve_currency("Lunch", None, None).is_none());
        assert!(resolve_currency("午餐", None, Some("??")).is_none());
    }

    #[test]
    fn test_unknown_bare_token_accepted() {
        assert_eq!(resolve_currency("XYZ", None, None).as_deref(), Some("XYZ"));
    }
}
