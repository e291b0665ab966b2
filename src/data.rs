//! Cell-level normalizers for the two typed columns in a chargeback log.
//!
//! The two parsers deliberately fail differently: an unreadable date yields
//! `None` and the row is later excluded from range filtering, while an
//! unreadable amount yields `0.0` and the row still counts. Callers must not
//! treat `0.0` as proof of "no chargeback" — only as "unparseable or
//! genuinely zero".

use chrono::{Datelike, NaiveDate};

/// Accepted date layouts, tried in order. Order is the tie-break for strings
/// that are valid under more than one layout: `"01/02/2026"` resolves as
/// month/day/year because `%m/%d/%Y` precedes `%d/%m/%Y`.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d/%m/%Y",
    "%Y.%m.%d",
];

/// Characters stripped before the amount is parsed as a float.
const AMOUNT_NOISE: &[char] = &['$', '₩', '¥', ',', ' '];

/// Parses a raw date cell against [`DATE_FORMATS`], returning the first
/// layout that matches. Empty and unrecognized input yield `None`.
pub fn parse_chargeback_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|fmt| {
        let parsed = NaiveDate::parse_from_str(trimmed, fmt).ok()?;
        // chrono lets %Y match fewer than four digits; the four-digit-year
        // layouts must not swallow two-digit-year input meant for %m/%d/%y.
        if fmt.contains("%Y") && !trimmed.contains(&format!("{:04}", parsed.year())) {
            return None;
        }
        Some(parsed)
    })
}

/// Parses a raw amount cell, stripping currency symbols, thousands
/// separators, and spaces first. Empty or unparseable input yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let cleaned: String = trimmed.chars().filter(|c| !AMOUNT_NOISE.contains(c)).collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Rounds to two decimal places. Applied once to grand totals so per-row
/// rounding drift never accumulates.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place, used for percentage figures.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
