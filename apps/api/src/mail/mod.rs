//! Mail Sync — pulls resume attachments from an IMAP inbox into the candidate directory.
//!
//! `MailFetcher` is the narrow seam: production uses `ImapMailbox` (blocking IMAP over TLS),
//! tests use an in-memory fake. Fetching is blocking and must run inside
//! `tokio::task::spawn_blocking`.

pub mod handlers;
pub mod mailbox;
pub mod sync;

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

pub use mailbox::ImapMailbox;
pub use sync::{sync_mailbox, SyncReport};

/// Subject words that mark a message as a likely application.
pub const SUBJECT_TERMS: [&str; 4] = ["curriculo", "cv", "vaga", "trabalho"];

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail server rejected the login: {0}")]
    Auth(String),

    #[error("could not connect to the mail server: {0}")]
    Connect(String),

    #[error("mail protocol error: {0}")]
    Protocol(String),
}

/// Mailbox login, supplied per request and never stored.
#[derive(Clone, Deserialize)]
pub struct MailCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of raw RFC 822 messages.
pub trait MailFetcher: Send + Sync {
    /// Returns every unseen message whose subject contains one of `SUBJECT_TERMS`.
    fn fetch_unseen(&self, credentials: &MailCredentials) -> Result<Vec<Vec<u8>>, MailError>;
}

/// IMAP SEARCH criteria: `UNSEEN` and a subject matching any of `terms`.
///
/// IMAP `OR` is binary and prefix, so n terms need n − 1 leading `OR`s.
pub fn build_search_query(terms: &[&str]) -> String {
    let mut query = String::from("UNSEEN");
    for _ in 1..terms.len() {
        query.push_str(" OR");
    }
    for term in terms {
        query.push_str(&format!(" SUBJECT \"{}\"", term.replace('"', "")));
    }
    query
}
