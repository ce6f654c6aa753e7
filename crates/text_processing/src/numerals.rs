//! Chinese Numeral Interpreter
//!
//! Converts traditional Chinese numerals (including financial forms such as
//! 拾/佰/仟/萬/億) into floating point values.
//!
//! Integers use the "section" algorithm: units below 万 accumulate into the
//! current section, while 万 and 亿 fold the section into the running total.
//! An optional 点 introduces a fractional part, and a leading 负/負 flips the
//! sign.
//!
//! # Examples
//! ```
//! use expense_parser_text_processing::numerals::parse_chinese_numeral;
//! assert_eq!(parse_chinese_numeral("一百二十三点五"), Some(123.5));
//! assert_eq!(parse_chinese_numeral("两万三千"), Some(23000.0));
//! assert_eq!(parse_chinese_numeral("负五"), Some(-5.0));
//! ```

use std::borrow::Cow;

/// Digit characters and their values
pub const CHINESE_DIGITS: &[(char, u64)] = &[
    ('零', 0),
    ('〇', 0),
    ('一', 1),
    ('二', 2),
    ('两', 2),
    ('三', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
];

/// Magnitude units and their multipliers
pub const CHINESE_UNITS: &[(char, u64)] = &[
    ('十', 10),
    ('拾', 10),
    ('百', 100),
    ('佰', 100),
    ('千', 1_000),
    ('仟', 1_000),
    ('万', 10_000),
    ('萬', 10_000),
    ('亿', 100_000_000),
    ('億', 100_000_000),
];

/// Separates the integer part from the fractional part
pub const DECIMAL_MARKER: char = '点';

/// Leading sign markers (simplified and traditional)
pub const NEGATIVE_MARKERS: &[char] = &['负', '負'];

/// Units at or above this magnitude close the current section
const SECTION_MAGNITUDE: u64 = 10_000;

/// Fractional digits beyond this are ignored (f64 precision is exhausted)
const MAX_FRACTION_DIGITS: i32 = 15;

/// Value of a digit character
pub fn digit_value(c: char) -> Option<u64> {
    CHINESE_DIGITS
        .iter()
        .find(|(digit, _)| *digit == c)
        .map(|(_, value)| *value)
}

/// Multiplier of a unit character
pub fn unit_value(c: char) -> Option<u64> {
    CHINESE_UNITS
        .iter()
        .find(|(unit, _)| *unit == c)
        .map(|(_, value)| *value)
}

/// Whether `c` belongs to the numeral vocabulary (digits, units, markers)
pub fn is_numeral_char(c: char) -> bool {
    digit_value(c).is_some()
        || unit_value(c).is_some()
        || c == DECIMAL_MARKER
        || NEGATIVE_MARKERS.contains(&c)
}

/// Parse a Chinese numeral string into a signed value
///
/// Returns `None` when neither the integer nor the fractional part contains
/// a recognised character.
pub fn parse_chinese_numeral(text: &str) -> Option<f64> {
    let mut rest = text.trim();
    if rest.is_empty() {
        return None;
    }

    let mut sign = 1.0;
    if let Some(stripped) = rest.strip_prefix(NEGATIVE_MARKERS) {
        sign = -1.0;
        rest = stripped;
    }

    let (integer_text, fraction_text) = match rest.split_once(DECIMAL_MARKER) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rest, None),
    };

    let integer = parse_integer_part(integer_text);
    let fraction = fraction_text.and_then(parse_fraction_part);

    if integer.is_none() && fraction.is_none() {
        return None;
    }

    let value = integer.unwrap_or(0) as f64 + fraction.unwrap_or(0.0);
    Some(sign * value)
}

/// Section algorithm over the integer part
///
/// Unknown characters are skipped. `None` if no digit or unit was seen.
fn parse_integer_part(text: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut section: u64 = 0;
    let mut pending: u64 = 0;
    let mut seen = false;

    for c in text.chars() {
        if let Some(digit) = digit_value(c) {
            pending = digit;
            seen = true;
            continue;
        }

        let Some(unit) = unit_value(c) else {
            continue;
        };
        seen = true;

        // "十二" means 12: a bare ten implies a leading one
        if pending == 0 && unit <= 10 {
            pending = 1;
        }

        if unit < SECTION_MAGNITUDE {
            section = section.saturating_add(pending.saturating_mul(unit));
        } else {
            total = total.saturating_add(section.saturating_add(pending).saturating_mul(unit));
            section = 0;
        }
        pending = 0;
    }

    seen.then(|| total.saturating_add(section).saturating_add(pending))
}

/// Positional fraction after the decimal marker
///
/// Stops at the first non-digit. `None` if no digit was read.
fn parse_fraction_part(text: &str) -> Option<f64> {
    let mut mantissa: u64 = 0;
    let mut places: i32 = 0;

    for c in text.chars() {
        let Some(digit) = digit_value(c) else {
            break;
        };
        if places == MAX_FRACTION_DIGITS {
            break;
        }
        mantissa = mantissa * 10 + digit;
        places += 1;
    }

    (places > 0).then(|| mantissa as f64 / 10f64.powi(places))
}

/// Map full-width digits and separators (as typed by CJK input methods) to ASCII
pub fn normalize_fullwidth_digits(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_fullwidth_numeric) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
                '．' => '.',
                '，' => ',',
                '－' => '-',
                '／' => '/',
                _ => c,
            })
            .collect(),
    )
}

fn is_fullwidth_numeric(c: char) -> bool {
    matches!(c, '０'..='９' | '．' | '，' | '－' | '／')
}
