//! Currency values in Brazilian display form (`R$ 1.234,56`).

/// Parse a display amount into a number.
///
/// Strips the currency symbol, whitespace and thousands dots, then reads the
/// comma as the decimal separator. Anything that does not parse to a finite
/// number yields `0.0`, so callers cannot tell "zero" from "unparseable".
/// Amounts are never negative: a leading minus sign also yields `0.0`.
pub fn parse_amount(display: &str) -> f64 {
    let cleaned: String = display
        .chars()
        .filter(|c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Round a value to whole cents. Values beyond the `i64` range clamp to its bounds.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Add up cents, clamping at `i64::MAX` instead of overflowing.
pub fn sum_cents<I: IntoIterator<Item = i64>>(cents: I) -> i64 {
    cents.into_iter().fold(0, i64::saturating_add)
}

/// Render a value with two decimals and a decimal comma: `1234.5` → `"1234,50"`.
pub fn format_amount(value: f64) -> String {
    format_cents(to_cents(value))
}

/// Render whole cents with a decimal comma: `123456` → `"1234,56"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{},{:02}", sign, abs / 100, abs % 100)
}

/// Render a value as currency: `1234.5` → `"R$ 1234,50"`.
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_amount(value))
}
