//! Normalization of amounts typed by the user, and the matching display format.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a signed delta from free text.
///
/// Digits are kept, a minus sign counts only if it appears before the first
/// digit, and everything else (commas, spaces, currency marks) is dropped.
/// Empty input and a bare `"-"` both give 0. Values past the `i64` range
/// saturate.
pub fn parse_signed(text: &str) -> i64 {
    let mut negative = false;
    let mut seen_digit = false;
    let mut magnitude: i64 = 0;

    for c in text.chars() {
        if let Some(d) = c.to_digit(10) {
            seen_digit = true;
            let d = i64::from(d);
            magnitude = if negative {
                magnitude.saturating_mul(10).saturating_sub(d)
            } else {
                magnitude.saturating_mul(10).saturating_add(d)
            };
        } else if c == '-' && !seen_digit {
            negative = true;
        }
    }

    magnitude
}

/// Parse a non-negative amount from free text: every non-digit is dropped.
pub fn parse_amount(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Read an amount out of a loosely typed document value.
///
/// Accepts non-negative integers, floats (truncated), and numeric strings;
/// anything else is 0.
pub fn amount_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => parse_amount(s),
        _ => 0,
    }
}

/// Serde hook for amount fields that older documents stored as formatted
/// strings ("1,000,000") or left null.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// Read a signed delta out of a loosely typed document value.
pub fn delta_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_signed(s),
        _ => 0,
    }
}

/// Group digits in threes: `1234567` → `"1,234,567"`, `-1000` → `"-1,000"`.
pub fn format_amount(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Like [`format_amount`] with a trailing unit, e.g. `"1,000원"`.
pub fn format_with_unit(value: i64, unit: &str) -> String {
    format!("{}{unit}", format_amount(value))
}
