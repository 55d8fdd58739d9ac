//! Text normalization helpers
//!
//! Whitespace cleanup and the title fingerprint used as the weak blocking
//! key and as the input to similarity scoring.

use lazy_static::lazy_static;
use regex::Regex;

/// Default number of title tokens kept in a fingerprint
pub const DEFAULT_MAX_TOKENS: usize = 12;

lazy_static! {
    // Word runs: Unicode alphanumerics, underscore and apostrophe
    static ref TOKEN_REGEX: Regex = Regex::new(r"[\w']+").unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs to a single space and trim.
///
/// Absent input yields an empty string.
pub fn clean_text(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() => {
            WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
        }
        _ => String::new(),
    }
}

/// Generate a title fingerprint.
///
/// - Tokenizes on word runs (punctuation is dropped)
/// - Lowercases every token
/// - Keeps at most `max_tokens` tokens in original order
/// - Joins with single spaces
pub fn fingerprint(title: &str, max_tokens: usize) -> String {
    TOKEN_REGEX
        .find_iter(title)
        .take(max_tokens)
        .map(|m| m.as_str().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fingerprint with the default token budget
pub fn fingerprint_title(title: &str) -> String {
    fingerprint(title, DEFAULT_MAX_TOKENS)
}

/// Tokenize a string into lowercase tokens
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Generate n-grams from a token list
pub fn ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens
        .windows(n)
        .map(|window| {
            window
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
