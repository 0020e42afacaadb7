//! Keyword extraction and the keyword pre-filter.
//!
//! A keyword is any run of ≥ 4 word characters, lowercased. A candidate survives the
//! pre-filter only if it shares at least one keyword with the job description.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CandidateDocument;

/// Minimum keyword length, in characters.
pub const MIN_KEYWORD_LEN: usize = 4;

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b\w{{{MIN_KEYWORD_LEN},}}\b")).expect("keyword pattern is valid")
});

/// Returns the set of lowercase keywords in `text`.
pub fn extract_keywords(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    KEYWORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keeps candidates that share at least one keyword with the description, in input order.
///
/// A description without keywords matches nothing, so every candidate is dropped.
pub fn filter_by_keywords(
    candidates: Vec<CandidateDocument>,
    description: &str,
) -> Vec<CandidateDocument> {
    let wanted = extract_keywords(description);
    if wanted.is_empty() {
        return Vec::new();
    }

    candidates
        .into_iter()
        .filter(|c| !extract_keywords(&c.raw_text).is_disjoint(&wanted))
        .collect()
}
