//! Formatting utilities for text-mode cells and fields

use chrono::{DateTime, Utc};

/// Placeholder for missing values in tables.
pub const MISSING: &str = "-";

/// `2024-05-01 09:00 UTC`, or [`MISSING`].
#[must_use]
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || MISSING.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Hours with two decimals: `7.50`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// `yes` / `no`.
#[must_use]
pub const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// The string, or [`MISSING`] when absent or blank.
#[must_use]
pub fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

/// The id, or [`MISSING`] when absent or zero.
#[must_use]
pub fn id_or_missing(id: Option<u64>) -> String {
    id.filter(|id| *id != 0)
        .map_or_else(|| MISSING.to_string(), |id| id.to_string())
}
