//! Post-title noise stripping.
//!
//! Feed post titles carry markers that hurt catalog search relevance:
//! bracketed annotations (`[Official Video]`), parenthetical encoded
//! metadata (`(Official4K)`), and hyphen separators. [`normalize_title`]
//! removes them and nothing else.

use regex::Regex;
use std::sync::LazyLock;

/// Bracketed spans (greedy, first `[` to last `]`), parenthetical
/// word+digit+word tokens, and literal hyphens.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[.*\]|\(\w+\d+\w+\)+|-)").unwrap());

/// Strip noise markers from a post title before searching the catalog.
///
/// Whitespace left behind by removed markers is not trimmed; callers should
/// not assume a clean result. The bracket rule is deliberately greedy: a
/// title with several bracketed spans loses everything from the first `[`
/// to the last `]`.
pub fn normalize_title(title: &str) -> String {
    NOISE.replace_all(title, "").into_owned()
}
