// Screening: keyword pre-filter, TF-IDF ranking and per-candidate model verdicts.
// Ranking is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod tfidf;

pub use scoring::TextGenerator;
