use once_cell::sync::Lazy;
use regex::Regex;

static CLEANER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}\s]+").expect("valid tokenizer regex"));

/// Splits already-normalized text into word tokens, dropping punctuation and
/// single-character tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    let cleaned = CLEANER.replace_all(input, " ").to_lowercase();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(|token| token.to_string())
        .collect()
}
