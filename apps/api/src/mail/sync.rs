//! Attachment extraction and the sync operation that writes resumes to the store.

use mail_parser::{MessageParser, MimeHeaders};
use serde::Serialize;
use tracing::{info, warn};

use crate::documents::loader::is_supported_filename;
use crate::documents::{CandidateStore, SaveOutcome};
use crate::mail::{MailCredentials, MailError, MailFetcher};

/// A named attachment from one message.
#[derive(Debug, Clone, PartialEq)]
pub struct MailAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedAttachment {
    pub name: String,
    pub reason: String,
}

/// Outcome of one mailbox sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub messages_scanned: usize,
    /// Newly written to the candidate directory.
    pub saved: Vec<String>,
    /// Skipped because a file with that name already exists.
    pub already_present: Vec<String>,
    /// Attachments without a resume extension.
    pub ignored: Vec<String>,
    /// Resume attachments that could not be written; the rest of the sync carries on.
    pub failed: Vec<FailedAttachment>,
}

/// Named attachments of a raw RFC 822 message. `None` if the message cannot be parsed.
pub fn named_attachments(raw: &[u8]) -> Option<Vec<MailAttachment>> {
    let message = MessageParser::default().parse(raw)?;
    Some(
        message
            .attachments()
            .filter_map(|part| {
                let filename = part.attachment_name()?.trim();
                if filename.is_empty() {
                    return None;
                }
                Some(MailAttachment {
                    filename: filename.to_string(),
                    bytes: part.contents().to_vec(),
                })
            })
            .collect(),
    )
}

/// Fetches matching messages and saves every `.pdf` / `.docx` / `.txt` attachment that is
/// not already in the store. Existing files are never overwritten.
///
/// Blocking: call from `spawn_blocking`.
pub fn sync_mailbox(
    fetcher: &dyn MailFetcher,
    credentials: &MailCredentials,
    store: &CandidateStore,
) -> Result<SyncReport, MailError> {
    let messages = fetcher.fetch_unseen(credentials)?;
    let mut report = SyncReport {
        messages_scanned: messages.len(),
        ..SyncReport::default()
    };

    for raw in &messages {
        let Some(attachments) = named_attachments(raw) else {
            warn!("Skipping unparseable message ({} bytes)", raw.len());
            continue;
        };

        for attachment in attachments {
            if !is_supported_filename(&attachment.filename) {
                report.ignored.push(attachment.filename);
                continue;
            }
            match store.save_if_absent(&attachment.filename, &attachment.bytes) {
                Ok(SaveOutcome::Saved(name)) => report.saved.push(name),
                Ok(SaveOutcome::AlreadyExists(name)) => report.already_present.push(name),
                Err(e) => {
                    warn!(attachment = %attachment.filename, "Could not store attachment: {e:#}");
                    report.failed.push(FailedAttachment {
                        name: attachment.filename,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }
    }

    info!(
        "Mail sync: {} messages, {} saved, {} already present, {} ignored, {} failed",
        report.messages_scanned,
        report.saved.len(),
        report.already_present.len(),
        report.ignored.len(),
        report.failed.len()
    );
    Ok(report)
}
