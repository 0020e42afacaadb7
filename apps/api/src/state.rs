use std::sync::Arc;

use crate::config::Config;
use crate::documents::CandidateStore;
use crate::layout::PageConfig;
use crate::mail::MailFetcher;
use crate::screening::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Verdict backend. Production: `LlmClient` (Gemini).
    pub llm: Arc<dyn TextGenerator>,
    /// Inbox used by mailbox sync. Production: `ImapMailbox`.
    pub mailbox: Arc<dyn MailFetcher>,
    pub store: CandidateStore,
    /// Report geometry: A4, Helvetica, 2 cm margins.
    pub page_config: PageConfig,
}
