use unicode_normalization::UnicodeNormalization;

/// Lower-cases and strips diacritics. Characters without an ASCII base form are dropped.
pub fn normalize_text(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(char::is_ascii)
        .collect()
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
