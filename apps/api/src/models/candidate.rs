use serde::{Deserialize, Serialize};

/// A resume whose extracted text is non-blank. Held only for the duration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub name: String,
    pub raw_text: String,
}

impl CandidateDocument {
    /// Returns `None` when the text is blank — blank documents never enter the pipeline.
    pub fn new(name: impl Into<String>, raw_text: impl Into<String>) -> Option<Self> {
        let raw_text = raw_text.into();
        if raw_text.trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            raw_text,
        })
    }
}

/// A candidate after TF-IDF ranking.
///
/// `similarity` is the raw cosine similarity against the job description (0.0 – 1.0).
/// Scores are only comparable within the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub raw_text: String,
    pub similarity: f64,
}

/// The free-text assessment for one ranked candidate.
///
/// `failed` marks a generation error; the error message is then carried in `text` so the
/// candidate still gets a section in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub name: String,
    pub similarity: f64,
    pub text: String,
    pub failed: bool,
}
