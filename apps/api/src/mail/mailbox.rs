//! Blocking IMAP-over-TLS implementation of `MailFetcher`.

use std::io::{Read, Write};

use tracing::{info, warn};

use crate::mail::{build_search_query, MailCredentials, MailError, MailFetcher, SUBJECT_TERMS};

#[derive(Debug, Clone)]
pub struct ImapMailbox {
    host: String,
    port: u16,
}

impl ImapMailbox {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl MailFetcher for ImapMailbox {
    fn fetch_unseen(&self, credentials: &MailCredentials) -> Result<Vec<Vec<u8>>, MailError> {
        let tls = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| MailError::Connect(e.to_string()))?;

        let client = imap::connect((self.host.as_str(), self.port), &self.host, &tls)
            .map_err(|e| MailError::Connect(format!("{}:{}: {e}", self.host, self.port)))?;

        let mut session = client
            .login(&credentials.username, &credentials.password)
            .map_err(|(e, _client)| match e {
                imap::error::Error::No(_) | imap::error::Error::Bad(_) => {
                    MailError::Auth(e.to_string())
                }
                other => MailError::Connect(other.to_string()),
            })?;
        info!("Logged in to {} as {}", self.host, credentials.username);

        let result = fetch_matching(&mut session);

        if let Err(e) = session.logout() {
            warn!("IMAP logout failed: {e}");
        }
        result
    }
}

fn fetch_matching<T: Read + Write>(
    session: &mut imap::Session<T>,
) -> Result<Vec<Vec<u8>>, MailError> {
    session
        .select("INBOX")
        .map_err(|e| MailError::Protocol(format!("SELECT INBOX: {e}")))?;

    let query = build_search_query(&SUBJECT_TERMS);
    let mut ids: Vec<u32> = session
        .search(&query)
        .map_err(|e| MailError::Protocol(format!("SEARCH: {e}")))?
        .into_iter()
        .collect();

    if ids.is_empty() {
        info!("No unseen application messages");
        return Ok(Vec::new());
    }
    ids.sort_unstable();

    let sequence_set = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let messages = session
        .fetch(sequence_set, "RFC822")
        .map_err(|e| MailError::Protocol(format!("FETCH: {e}")))?;

    info!("Fetched {} unseen application messages", messages.len());
    Ok(messages
        .iter()
        .filter_map(|m| m.body().map(|b| b.to_vec()))
        .collect())
}
