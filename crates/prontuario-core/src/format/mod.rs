//! Formatting and parsing of the values shown on clinic screens.
//!
//! - [`masks`]: progressive input masks (time, date, currency, phone, CPF)
//! - [`amount`]: currency parsing and rendering
//! - [`dates`]: visit/appointment date conversions

mod amount;
mod dates;
mod masks;

pub use amount::*;
pub use dates::*;
pub use masks::*;

/// Rendering used everywhere a field has no value.
pub const MISSING_VALUE: &str = "—";

/// Render an optional field, falling back to [`MISSING_VALUE`].
pub fn display_or_missing(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => MISSING_VALUE,
    }
}

/// Turn a possibly blank string into an explicit optional.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_or_missing() {
        assert_eq!(display_or_missing(Some("Online")), "Online");
        assert_eq!(display_or_missing(Some("  ")), MISSING_VALUE);
        assert_eq!(display_or_missing(None), MISSING_VALUE);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank(" \n"), None);
        assert_eq!(non_blank("Ana"), Some("Ana".into()));
    }
}
