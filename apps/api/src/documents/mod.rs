// Document intake: text extraction for PDF / DOCX / TXT resumes and the flat candidate directory.

pub mod docx;
pub mod loader;
pub mod store;

pub use loader::{load_candidate, DocumentType};
pub use store::{CandidateStore, SaveOutcome};
