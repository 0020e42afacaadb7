//! Scoring Orchestrator — one generative-model call per ranked candidate.
//!
//! The model backend sits behind `TextGenerator` so tests can swap in a mock and the
//! production `LlmClient` stays the only code that talks to the Gemini API.
//! A failed call becomes that candidate's verdict; it never aborts the batch.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::{RankedCandidate, Verdict};
use crate::screening::prompts::SCORING_PROMPT_TEMPLATE;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Service(String),

    #[error("model returned no text")]
    EmptyContent,
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => GenerationError::EmptyContent,
            other => GenerationError::Service(other.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A prompt-in, text-out model backend.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(self.generate_text(prompt).await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn build_scoring_prompt(description: &str, candidate_text: &str) -> String {
    fill_template(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("{description}", description),
            ("{candidate_text}", candidate_text),
        ],
    )
}

/// Single pass over `template`: only slots in the template itself are substituted, so a
/// value that happens to contain another slot's name is inserted untouched.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match slots.iter().find(|(slot, _)| tail.starts_with(slot)) {
            Some((slot, value)) => {
                out.push_str(value);
                rest = &tail[slot.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Exactly one generator call. Blank output is `EmptyContent`.
pub async fn score_candidate(
    generator: &dyn TextGenerator,
    description: &str,
    candidate_text: &str,
) -> Result<String, GenerationError> {
    let prompt = build_scoring_prompt(description, candidate_text);
    let text = generator.generate(&prompt).await?;
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyContent);
    }
    Ok(text)
}

/// Scores every ranked candidate, at most `concurrency` calls in flight.
/// Output order equals `ranked` order regardless of completion order.
pub async fn score_candidates(
    generator: &dyn TextGenerator,
    description: &str,
    ranked: &[RankedCandidate],
    concurrency: usize,
) -> Vec<Verdict> {
    let concurrency = concurrency.max(1);
    info!(
        "Scoring {} candidates (concurrency={})",
        ranked.len(),
        concurrency
    );

    // Boxing each future up front keeps the stream free of borrowing closures, so the
    // handler future stays `Send`.
    let scoring: Vec<BoxFuture<'_, Verdict>> = ranked
        .iter()
        .map(|candidate| verdict_for(generator, description, candidate).boxed())
        .collect();

    stream::iter(scoring).buffered(concurrency).collect().await
}

async fn verdict_for(
    generator: &dyn TextGenerator,
    description: &str,
    candidate: &RankedCandidate,
) -> Verdict {
    match score_candidate(generator, description, &candidate.raw_text).await {
        Ok(text) => Verdict {
            name: candidate.name.clone(),
            similarity: candidate.similarity,
            text,
            failed: false,
        },
        Err(e) => {
            warn!(candidate = %candidate.name, "Scoring failed: {e}");
            Verdict {
                name: candidate.name.clone(),
                similarity: candidate.similarity,
                text: format!("Scoring failed: {e}"),
                failed: true,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replies with a fixed text, fails for prompts containing `fail_marker`, and
    /// records every prompt it receives.
    pub(crate) struct MockGenerator {
        pub reply: String,
        pub fail_marker: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                fail_marker: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing_on(reply: &str, marker: &str) -> Self {
            Self {
                fail_marker: Some(marker.to_string()),
                ..Self::replying(reply)
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.fail_marker {
                Some(marker) if prompt.contains(marker.as_str()) => {
                    Err(GenerationError::Service("quota exceeded".to_string()))
                }
                _ => Ok(self.reply.clone()),
            }
        }
    }

    /// Earlier candidates sleep longer, so completion order is the reverse of input order.
    struct SlowFirstGenerator {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for SlowFirstGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let index: u64 = prompt
                .lines()
                .find_map(|l| l.strip_prefix("candidate-"))
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50 * (4 - index))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("verdict {index}"))
        }
    }

    fn ranked(name: &str, text: &str, similarity: f64) -> RankedCandidate {
        RankedCandidate {
            name: name.to_string(),
            raw_text: text.to_string(),
            similarity,
        }
    }

    #[test]
    fn test_prompt_contains_description_and_resume_verbatim() {
        let description = "Senior Rust engineer\nRemote, {flexible}";
        let resume = "Jane Doe — 8 years of Rust, Kafka & Postgres";
        let prompt = build_scoring_prompt(description, resume);

        assert!(prompt.contains(description));
        assert!(prompt.contains(resume));
        assert!(prompt.contains("0 to 100"));
        assert!(prompt.contains("summary of why"));
        assert!(prompt.find(description).unwrap() < prompt.find(resume).unwrap());
    }

    #[test]
    fn test_slot_names_inside_values_are_not_substituted() {
        let description = "Paste your resume as {candidate_text} in the email";
        let resume = "My template skills: {description} and {candidate_text}";
        let prompt = build_scoring_prompt(description, resume);

        assert!(prompt.contains(description));
        assert!(prompt.contains(resume));
        assert_eq!(prompt.matches(resume).count(), 1);
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{a} {b} {", &[("{a}", "x")]);
        assert_eq!(filled, "x {b} {");
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_scoring_future_is_send() {
        let generator = MockGenerator::replying("ok");
        let dynamic: &dyn TextGenerator = &generator;
        let candidates = vec![ranked("a.txt", "x", 0.5)];
        let future = score_candidates(dynamic, "rust", &candidates, 2);
        assert_send(&future);
        assert_eq!(future.await.len(), 1);
    }

    #[tokio::test]
    async fn test_score_candidate_makes_exactly_one_call() {
        let generator = MockGenerator::replying("1. 85\n2. Strong match.");
        let text = score_candidate(&generator, "rust", "rust engineer")
            .await
            .unwrap();
        assert_eq!(text, "1. 85\n2. Strong match.");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_content() {
        let generator = MockGenerator::replying("   \n");
        let err = score_candidate(&generator, "rust", "rust engineer")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyContent));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_candidate() {
        let generator = MockGenerator::failing_on("70: fine", "BROKEN");
        let candidates = vec![
            ranked("a.txt", "rust engineer", 0.9),
            ranked("b.txt", "BROKEN resume", 0.5),
            ranked("c.txt", "go engineer", 0.1),
        ];

        let verdicts = score_candidates(&generator, "rust", &candidates, 1).await;

        assert_eq!(verdicts.len(), 3);
        assert_eq!(generator.calls(), 3);
        assert!(!verdicts[0].failed);
        assert!(verdicts[1].failed);
        assert_eq!(verdicts[1].text, "Scoring failed: quota exceeded");
        assert!(!verdicts[2].failed);
        assert_eq!(verdicts[2].text, "70: fine");
    }

    #[tokio::test]
    async fn test_verdicts_follow_ranked_order_and_carry_similarity() {
        let generator = MockGenerator::replying("ok");
        let candidates = vec![ranked("top.pdf", "x", 0.8), ranked("next.pdf", "y", 0.3)];

        let verdicts = score_candidates(&generator, "rust", &candidates, 1).await;
        let names: Vec<&str> = verdicts.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["top.pdf", "next.pdf"]);
        assert_eq!(verdicts[0].similarity, 0.8);
    }

    #[tokio::test]
    async fn test_concurrent_scoring_preserves_order() {
        let generator = SlowFirstGenerator {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        };
        let candidates: Vec<_> = (0..4)
            .map(|i| ranked(&format!("{i}.txt"), &format!("candidate-{i}"), 1.0))
            .collect();

        let verdicts = score_candidates(&generator, "rust", &candidates, 4).await;

        let texts: Vec<&str> = verdicts.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["verdict 0", "verdict 1", "verdict 2", "verdict 3"]);
        assert!(generator.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped_to_sequential() {
        let generator = MockGenerator::replying("ok");
        let candidates = vec![ranked("a.txt", "x", 0.5)];
        let verdicts = score_candidates(&generator, "rust", &candidates, 0).await;
        assert_eq!(verdicts.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_ranked_list_makes_no_calls() {
        let generator = MockGenerator::replying("ok");
        assert!(score_candidates(&generator, "rust", &[], 2).await.is_empty());
        assert_eq!(generator.calls(), 0);
    }
}
