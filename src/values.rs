// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lenient parsing of spreadsheet-style cell values.
//!
//! Shared by CSV import and grid edits, where numbers arrive as text typed by
//! people in either the `1.234,50` or the `1,234.50` convention.

const TRUTHY: [&str; 5] = ["true", "1", "yes", "y", "e"];
const FALSY: [&str; 5] = ["false", "0", "no", "n", ""];

/// Parse a decimal written with either `,` or `.` as decimal separator.
///
/// Whitespace, currency symbols and units are ignored. When both separators
/// occur, the one appearing last is the decimal separator. A separator that
/// occurs more than once is a thousands separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let decimal_sep = match (commas, dots) {
        (0, 0) => None,
        (_, 0) => (commas == 1).then_some(','),
        (0, _) => (dots == 1).then_some('.'),
        _ => {
            let last_comma = cleaned.rfind(',')?;
            let last_dot = cleaned.rfind('.')?;
            Some(if last_comma > last_dot { ',' } else { '.' })
        }
    };

    let normalized: String = match decimal_sep {
        Some(sep) => {
            if cleaned.matches(sep).count() > 1 {
                return None;
            }
            cleaned
                .chars()
                .filter(|c| *c == sep || !matches!(c, ',' | '.'))
                .map(|c| if c == sep { '.' } else { c })
                .collect()
        }
        None => cleaned.chars().filter(|c| !matches!(c, ',' | '.')).collect(),
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole number, accepting decimal spellings with no fractional part.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    parse_decimal(trimmed)
        .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
        .map(|v| v as i64)
}

/// Whether a cell spells "yes" in one of the accepted ways.
pub fn parse_truthy(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Parse a boolean cell, returning `None` for unrecognized spellings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
