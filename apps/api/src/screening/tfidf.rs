//! TF-IDF Ranker — orders candidates by cosine similarity to the job description.
//!
//! # Algorithm
//! 1. Corpus = description followed by every candidate text (description is document 0).
//! 2. Tokens: lowercase runs of ≥ 2 word characters.
//! 3. Weight = raw term count × smoothed IDF, where `idf(t) = ln((1 + n) / (1 + df(t))) + 1`.
//! 4. Every document vector is L2-normalised, so cosine similarity is a dot product.
//! 5. Stable sort by similarity descending, then truncate to `top_n`.
//!
//! The vocabulary is rebuilt on every call, so scores are only comparable within one run.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CandidateDocument, RankedCandidate};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Sparse term-index → weight map.
pub type SparseVector = HashMap<usize, f64>;

/// TF-IDF vocabulary and IDF weights fitted on one corpus.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Builds the vocabulary and smoothed IDF weights from `documents`.
    pub fn fit(documents: &[&str]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for document in documents {
            let counts = term_counts(document, &mut vocabulary);
            document_frequency.resize(vocabulary.len(), 0);
            for index in counts.keys() {
                document_frequency[*index] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// L2-normalised TF-IDF vector for `text`. Terms outside the vocabulary are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut vector: SparseVector = HashMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *vector.entry(index).or_insert(0.0) += 1.0;
            }
        }
        for (index, weight) in vector.iter_mut() {
            *weight *= self.idf[*index];
        }
        normalize(&mut vector);
        vector
    }

    pub fn fit_transform(documents: &[&str]) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents);
        let vectors = documents.iter().map(|d| vectorizer.transform(d)).collect();
        (vectorizer, vectors)
    }
}

/// Cosine similarity of two sparse vectors; 0.0 if either is empty.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(index, wa)| large.get(index).map(|wb| wa * wb))
        .sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Ranks candidates against the description and returns at most `top_n` of them.
pub fn rank_by_tfidf(
    candidates: &[CandidateDocument],
    description: &str,
    top_n: usize,
) -> Vec<RankedCandidate> {
    // Nothing to rank.
    if candidates.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let corpus: Vec<&str> = std::iter::once(description)
        .chain(candidates.iter().map(|c| c.raw_text.as_str()))
        .collect();
    let (_, vectors) = TfidfVectorizer::fit_transform(&corpus);
    let Some((query, documents)) = vectors.split_first() else {
        return Vec::new();
    };

    let mut scored: Vec<(usize, f64)> = documents
        .iter()
        .map(|d| cosine_similarity(query, d))
        .enumerate()
        .collect();

    // sort_by is stable: equal scores keep input order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_n);

    scored
        .into_iter()
        .map(|(index, similarity)| {
            let candidate = &candidates[index];
            RankedCandidate {
                name: candidate.name.clone(),
                raw_text: candidate.raw_text.clone(),
                similarity,
            }
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(text: &str, vocabulary: &mut HashMap<String, usize>) -> HashMap<usize, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        let next = vocabulary.len();
        let index = *vocabulary.entry(token).or_insert(next);
        *counts.entry(index).or_insert(0) += 1;
    }
    counts
}

fn l2_norm(vector: &SparseVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

fn normalize(vector: &mut SparseVector) {
    let norm = l2_norm(vector);
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}
