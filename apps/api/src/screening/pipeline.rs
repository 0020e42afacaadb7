//! Analysis pipeline — load → keyword pre-filter → TF-IDF top-N → one verdict per candidate.
//!
//! Loading and ranking are CPU-bound and run on the blocking pool; scoring is async.

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::documents::store::StoredFile;
use crate::documents::{load_candidate, CandidateStore, DocumentType};
use crate::errors::AppError;
use crate::models::{CandidateDocument, RankedCandidate, Verdict};
use crate::screening::keywords::filter_by_keywords;
use crate::screening::scoring::{score_candidates, TextGenerator};
use crate::screening::tfidf::rank_by_tfidf;

/// A file received with the request. Uploads are analysed but never persisted.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// The declared type for the loader: the MIME type when it names a supported format,
    /// otherwise the filename. Browsers often send `application/octet-stream`.
    fn declared_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(mime) if DocumentType::from_mime(mime).is_some() => mime,
            _ => &self.filename,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub top_n: usize,
    pub scoring_concurrency: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// Documents with non-blank text.
    pub candidates_loaded: usize,
    /// Documents that survived the keyword pre-filter.
    pub candidates_filtered: usize,
    pub skipped: Vec<SkippedFile>,
    /// One per ranked candidate, in ranked order.
    pub verdicts: Vec<Verdict>,
}

/// Turns stored files and uploads into candidate documents, stored files first.
pub fn load_candidates(
    stored: Vec<StoredFile>,
    uploads: Vec<Upload>,
) -> (Vec<CandidateDocument>, Vec<SkippedFile>) {
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    let inputs = stored
        .iter()
        .map(|f| (f.name.as_str(), f.bytes.as_slice(), f.name.as_str()))
        .chain(
            uploads
                .iter()
                .map(|u| (u.filename.as_str(), u.bytes.as_ref(), u.declared_type())),
        );

    for (name, bytes, declared_type) in inputs {
        match load_candidate(name, bytes, declared_type) {
            Ok(Some(document)) => documents.push(document),
            Ok(None) => skipped.push(SkippedFile {
                name: name.to_string(),
                reason: "no extractable text".to_string(),
            }),
            Err(e) => {
                warn!(file = name, "Skipping file: {e}");
                skipped.push(SkippedFile {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (documents, skipped)
}

/// Keyword pre-filter followed by TF-IDF ranking. Returns the filtered count and the top-N.
pub fn shortlist(
    documents: Vec<CandidateDocument>,
    description: &str,
    top_n: usize,
) -> (usize, Vec<RankedCandidate>) {
    let filtered = filter_by_keywords(documents, description);
    let ranked = rank_by_tfidf(&filtered, description, top_n);
    (filtered.len(), ranked)
}

/// Runs the full analysis over the candidate directory plus `uploads`.
///
/// Fails with `Validation` when the description is blank or no candidate has text.
pub async fn run_analysis(
    generator: &dyn TextGenerator,
    store: &CandidateStore,
    settings: PipelineSettings,
    description: &str,
    uploads: Vec<Upload>,
) -> Result<AnalysisOutcome, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Describe the job opening before running an analysis".to_string(),
        ));
    }

    let store = store.clone();
    let (documents, skipped) = tokio::task::spawn_blocking(move || {
        let stored = store.read_all()?;
        Ok::<_, anyhow::Error>(load_candidates(stored, uploads))
    })
    .await
    .context("Document loading task panicked")??;

    if documents.is_empty() {
        return Err(AppError::Validation(
            "No readable resumes: upload files or sync the mailbox first".to_string(),
        ));
    }
    let candidates_loaded = documents.len();

    let owned_description = description.to_string();
    let top_n = settings.top_n;
    let (candidates_filtered, ranked) =
        tokio::task::spawn_blocking(move || shortlist(documents, &owned_description, top_n))
            .await
            .context("Ranking task panicked")?;

    info!(
        "Analysis: {} loaded, {} skipped, {} passed keyword filter, {} ranked",
        candidates_loaded,
        skipped.len(),
        candidates_filtered,
        ranked.len()
    );

    let verdicts =
        score_candidates(generator, description, &ranked, settings.scoring_concurrency).await;

    Ok(AnalysisOutcome {
        candidates_loaded,
        candidates_filtered,
        skipped,
        verdicts,
    })
}
