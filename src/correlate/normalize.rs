//! Name canonicalization for fuzzy entity matching
//!
//! LLM output spells the same entity inconsistently ("Jeffrey Epstein",
//! "Epstein, Jeffrey", "M. Epstein") and mixes accented and plain forms.
//! Normalization makes word-order-independent, diacritic-insensitive,
//! case-insensitive equality a cheap string compare: lowercase, NFD-decompose
//! and strip combining marks, collapse non-alphanumeric runs to spaces, drop
//! tokens of two characters or fewer, sort the rest, concatenate.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::record::NameLike;

/// Canonicalize a name for equality matching.
///
/// The empty string normalizes to the empty string and must never be treated
/// as a match key — callers skip empty results.
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let spaced: String = stripped
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut tokens: Vec<&str> = spaced
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect();
    tokens.sort_unstable();
    tokens.concat()
}

/// Normalize a string-or-object name field.
pub fn normalize_name_like(name: &NameLike) -> String {
    normalize_name(name.as_str())
}
