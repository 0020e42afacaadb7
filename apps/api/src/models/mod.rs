pub mod candidate;

pub use candidate::{CandidateDocument, RankedCandidate, Verdict};
