//! Progressive input masks.
//!
//! Every mask strips anything that is not an ASCII digit, truncates to the
//! canonical length and re-inserts punctuation for however many digits are
//! present. Applying a mask to its own output returns the same string.

/// Maximum digits for `HHMM`.
const TIME_DIGITS: usize = 4;

/// Maximum digits for `DDMMYYYY`.
const DATE_DIGITS: usize = 8;

/// Maximum digits for a Brazilian mobile number (area code + 9 digits).
const PHONE_DIGITS: usize = 11;

/// Maximum digits for a CPF.
const CPF_DIGITS: usize = 11;

/// Keep only ASCII digits, at most `limit` of them.
fn digits(input: &str, limit: usize) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(limit)
        .collect()
}

/// Time of day as typed: `"9"` → `"9h"`, `"0930"` → `"09h 30min"`.
pub fn time_mask(input: &str) -> String {
    let d = digits(input, TIME_DIGITS);
    match d.len() {
        0 => String::new(),
        1 | 2 => format!("{}h", d),
        _ => format!("{}h {}min", &d[..2], &d[2..]),
    }
}

/// Calendar date as typed: `"0102"` → `"01/02"`, `"01022024"` → `"01/02/2024"`.
pub fn date_mask(input: &str) -> String {
    let d = digits(input, DATE_DIGITS);
    match d.len() {
        0..=2 => d,
        3..=4 => format!("{}/{}", &d[..2], &d[2..]),
        _ => format!("{}/{}/{}", &d[..2], &d[2..4], &d[4..]),
    }
}

/// Currency as typed, digits read as cents: `"12345"` → `"R$ 123,45"`.
///
/// Empty input stays empty. The conversion is done on the digit string so
/// arbitrarily long input never overflows.
pub fn currency_mask(input: &str) -> String {
    let d: String = input.chars().filter(char::is_ascii_digit).collect();
    if d.is_empty() {
        return String::new();
    }

    let trimmed = d.trim_start_matches('0');
    let padded = format!("{:0>3}", trimmed);
    let (units, cents) = padded.split_at(padded.len() - 2);
    format!("R$ {},{}", units, cents)
}

/// Mobile phone as typed: `(DD) D DDDD-DDDD`.
pub fn phone_mask(input: &str) -> String {
    let d = digits(input, PHONE_DIGITS);
    match d.len() {
        0 => String::new(),
        1..=2 => format!("({}", d),
        3 => format!("({}) {}", &d[..2], &d[2..]),
        4..=7 => format!("({}) {} {}", &d[..2], &d[2..3], &d[3..]),
        _ => format!("({}) {} {}-{}", &d[..2], &d[2..3], &d[3..7], &d[7..]),
    }
}

/// CPF as typed: `DDD.DDD.DDD-DD`.
pub fn cpf_mask(input: &str) -> String {
    let d = digits(input, CPF_DIGITS);
    match d.len() {
        0..=3 => d,
        4..=6 => format!("{}.{}", &d[..3], &d[3..]),
        7..=9 => format!("{}.{}.{}", &d[..3], &d[3..6], &d[6..]),
        _ => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
    }
}
