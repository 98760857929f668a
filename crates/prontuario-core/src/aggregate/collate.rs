//! Locale-aware string ordering for Brazilian Portuguese names.
//!
//! Comparison levels:
//! - primary: base letters, ignoring case and diacritics (`"Ávila"` ~ `"avila"`)
//! - secondary: unaccented before accented (`"Avila"` < `"Ávila"`)
//! - tertiary: lowercase before uppercase (`"ana"` < `"Ana"`)
//! - finally code point order, so distinct strings never compare equal

use std::cmp::Ordering;

/// Split a lowercase character into its base letter and an accent rank (0 = none).
fn decompose(c: char) -> (char, u8) {
    match c {
        'á' => ('a', 1),
        'à' => ('a', 2),
        'â' => ('a', 3),
        'ã' => ('a', 4),
        'ä' => ('a', 5),
        'é' => ('e', 1),
        'è' => ('e', 2),
        'ê' => ('e', 3),
        'ë' => ('e', 5),
        'í' => ('i', 1),
        'ì' => ('i', 2),
        'î' => ('i', 3),
        'ï' => ('i', 5),
        'ó' => ('o', 1),
        'ò' => ('o', 2),
        'ô' => ('o', 3),
        'õ' => ('o', 4),
        'ö' => ('o', 5),
        'ú' => ('u', 1),
        'ù' => ('u', 2),
        'û' => ('u', 3),
        'ü' => ('u', 5),
        'ç' => ('c', 6),
        'ñ' => ('n', 4),
        'ý' => ('y', 1),
        'ÿ' => ('y', 5),
        other => (other, 0),
    }
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Primary collation key: lowercase base letters.
pub fn fold_name(s: &str) -> String {
    lowercase_chars(s).into_iter().map(|c| decompose(c).0).collect()
}

/// Compare two strings the way a pt-BR collator would.
pub fn compare_pt_br(a: &str, b: &str) -> Ordering {
    let la = lowercase_chars(a);
    let lb = lowercase_chars(b);

    let primary = la
        .iter()
        .map(|c| decompose(*c).0)
        .cmp(lb.iter().map(|c| decompose(*c).0));
    if primary != Ordering::Equal {
        return primary;
    }

    let secondary = la
        .iter()
        .map(|c| decompose(*c).1)
        .cmp(lb.iter().map(|c| decompose(*c).1));
    if secondary != Ordering::Equal {
        return secondary;
    }

    let tertiary = a
        .chars()
        .map(char::is_uppercase)
        .cmp(b.chars().map(char::is_uppercase));

    tertiary.then_with(|| a.cmp(b))
}
