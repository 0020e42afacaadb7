//! Document Loader — turns raw resume bytes into text.
//!
//! Supported inputs: PDF (pdf-extract), DOCX (see `docx`), and UTF-8 plain text.
//! The declared type may be a MIME type, a filename, or a bare extension.
//!
//! Parse failures are returned as `LoadError::ParseFailure`; `load_candidate` degrades
//! them to "no text" so the file is filtered out instead of aborting the run.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::documents::docx::extract_docx_paragraphs;
use crate::models::CandidateDocument;

const MIME_PDF: &str = "application/pdf";
const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const MIME_TEXT: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Pdf,
    Docx,
    PlainText,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentType::Pdf => "PDF",
            DocumentType::Docx => "DOCX",
            DocumentType::PlainText => "plain-text",
        };
        f.write_str(label)
    }
}

impl DocumentType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentType::Pdf),
            "docx" => Some(DocumentType::Docx),
            "txt" => Some(DocumentType::PlainText),
            _ => None,
        }
    }

    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Matches the MIME essence only; parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            MIME_PDF => Some(DocumentType::Pdf),
            MIME_DOCX => Some(DocumentType::Docx),
            MIME_TEXT => Some(DocumentType::PlainText),
            _ => None,
        }
    }

    /// Resolves a declared type: MIME type, bare extension (`pdf`, `.pdf`), or filename.
    pub fn resolve(declared: &str) -> Result<Self, LoadError> {
        let declared = declared.trim();
        Self::from_mime(declared)
            .or_else(|| Self::from_extension(declared.trim_start_matches('.')))
            .or_else(|| Self::from_filename(declared))
            .ok_or_else(|| LoadError::UnsupportedFormat(declared.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to parse {kind} document: {message}")]
    ParseFailure { kind: DocumentType, message: String },
}

/// Returns true if the filename carries one of the supported extensions (case-insensitive).
pub fn is_supported_filename(name: &str) -> bool {
    DocumentType::from_filename(name).is_some()
}

/// Extracts text from raw bytes given a declared type (MIME type, filename, or extension).
pub fn load_document(bytes: &[u8], declared_type: &str) -> Result<String, LoadError> {
    let kind = DocumentType::resolve(declared_type)?;
    extract_text(bytes, kind)
}

/// Extracts text from raw bytes of a known type.
pub fn extract_text(bytes: &[u8], kind: DocumentType) -> Result<String, LoadError> {
    match kind {
        DocumentType::Pdf => extract_pdf_text(bytes),
        DocumentType::Docx => extract_docx_paragraphs(bytes)
            .map(|paragraphs| paragraphs.join("\n"))
            .map_err(|e| LoadError::ParseFailure {
                kind,
                message: e.to_string(),
            }),
        DocumentType::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|e| LoadError::ParseFailure {
                kind,
                message: e.to_string(),
            })
        }
    }
}

/// Loads one candidate file.
///
/// - Unknown declared type → `Err(UnsupportedFormat)`; the caller skips the file.
/// - Parse failure → logged, treated as empty text → `Ok(None)`.
/// - Blank extracted text → `Ok(None)`.
pub fn load_candidate(
    name: &str,
    bytes: &[u8],
    declared_type: &str,
) -> Result<Option<CandidateDocument>, LoadError> {
    let kind = DocumentType::resolve(declared_type)?;

    let text = match extract_text(bytes, kind) {
        Ok(text) => text,
        Err(e) => {
            warn!(file = name, "Treating document as empty: {e}");
            String::new()
        }
    };

    let document = CandidateDocument::new(name, text);
    if document.is_none() {
        debug!(file = name, "No extractable text, document skipped");
    }
    Ok(document)
}

/// pdf-extract can panic on malformed input, so the call is isolated with `catch_unwind`.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, LoadError> {
    let result = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(LoadError::ParseFailure {
            kind: DocumentType::Pdf,
            message: e.to_string(),
        }),
        Err(_) => Err(LoadError::ParseFailure {
            kind: DocumentType::Pdf,
            message: "parser panicked on malformed PDF".to_string(),
        }),
    }
}
