//! Date conversions between display (`DD/MM/YYYY`) and storage (`YYYY-MM-DD`) forms.

use chrono::{Datelike, NaiveDate};

/// Display form used on visit records.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// ISO form used by appointments and for ordering.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a `DD/MM/YYYY` visit date. Empty or malformed input yields `None`.
pub fn parse_visit_date(display: &str) -> Option<NaiveDate> {
    let trimmed = display.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT).ok()
}

/// Parse an optional visit date.
pub fn parse_optional_visit_date(display: Option<&str>) -> Option<NaiveDate> {
    display.and_then(parse_visit_date)
}

/// Parse a `YYYY-MM-DD` appointment date.
pub fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), ISO_FORMAT).ok()
}

/// Rewrite a parseable ISO date as zero-padded `YYYY-MM-DD`.
pub fn canonical_iso_date(iso: &str) -> Option<String> {
    parse_iso_date(iso).map(|d| d.format(ISO_FORMAT).to_string())
}

/// Whether a parsed date falls in the given month (1-12) and year.
pub fn in_month(date: NaiveDate, month: u32, year: i32) -> bool {
    date.month() == month && date.year() == year
}

/// `"07/03/2025"` → `"2025-03-07"`. Returns `None` when the input is not a valid date.
pub fn display_to_iso(display: &str) -> Option<String> {
    parse_visit_date(display).map(|d| d.format(ISO_FORMAT).to_string())
}

/// `"2025-03-07"` → `"07/03/2025"`. Invalid input yields an empty string.
pub fn iso_to_display(iso: &str) -> String {
    parse_iso_date(iso)
        .map(|d| d.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// First and last day of a month, as ISO strings, for range queries.
pub fn month_bounds(year: i32, month: u32) -> Option<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next.pred_opt()?;
    Some((
        first.format(ISO_FORMAT).to_string(),
        last.format(ISO_FORMAT).to_string(),
    ))
}
