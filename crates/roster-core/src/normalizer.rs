//! Normalizer — folds cell values and queries into a comparable form.
//!
//! The same function is applied to both sides of every comparison: lowercase,
//! trim, then fold apostrophe look-alikes to ASCII `'`. Nothing else is
//! touched; inner whitespace, punctuation and other diacritics survive.

/// Code points that render like an apostrophe in Uzbek Latin text.
pub const APOSTROPHE_VARIANTS: [char; 5] = [
    '\u{2019}', // right single quotation mark
    '\u{2018}', // left single quotation mark
    '\u{02BC}', // modifier letter apostrophe
    '\u{02BB}', // modifier letter turned comma
    '`',
];

/// Normalize an optional value. Absent input becomes the empty string.
pub fn normalize(value: Option<&str>) -> String {
    value.map(normalize_str).unwrap_or_default()
}

/// Normalize a present value.
pub fn normalize_str(value: &str) -> String {
    value
        .to_lowercase()
        .trim()
        .chars()
        .map(|c| if APOSTROPHE_VARIANTS.contains(&c) { '\'' } else { c })
        .collect()
}
