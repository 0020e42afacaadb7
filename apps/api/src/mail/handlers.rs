//! Axum route handler for mailbox sync.

use anyhow::Context;
use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::mail::{sync_mailbox, MailCredentials, SyncReport};
use crate::state::AppState;

/// POST /api/v1/mailbox/sync
///
/// Downloads resume attachments from unseen application emails into the candidate
/// directory. Credentials are used for this request only.
pub async fn handle_sync_mailbox(
    State(state): State<AppState>,
    Json(credentials): Json<MailCredentials>,
) -> Result<Json<SyncReport>, AppError> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::Validation(
            "Both the email address and the password are required".to_string(),
        ));
    }

    let fetcher = state.mailbox.clone();
    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || {
        sync_mailbox(fetcher.as_ref(), &credentials, &store)
    })
    .await
    .context("Mail sync task panicked")??;

    Ok(Json(report))
}
