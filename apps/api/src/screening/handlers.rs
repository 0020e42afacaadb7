//! Axum route handlers for the Screening API.

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Verdict;
use crate::render::{render_report, REPORT_FILENAME};
use crate::screening::pipeline::{run_analysis, AnalysisOutcome, SkippedFile, Upload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub candidates_loaded: usize,
    pub candidates_filtered: usize,
    pub skipped: Vec<SkippedFile>,
    /// Ranked order, best TF-IDF similarity first.
    pub results: Vec<Verdict>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub directory: String,
    pub candidates: Vec<String>,
}

/// Verdicts from an earlier `/api/v1/analyses` response, rendered without re-scoring.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub results: Vec<Verdict>,
}

/// Parsed multipart body: a `description` text field and any number of `files` parts.
#[derive(Debug, Default)]
struct AnalysisForm {
    description: String,
    uploads: Vec<Upload>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Ranks the candidate directory plus uploaded files against the description and returns
/// one verdict per shortlisted candidate.
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = read_analysis_form(multipart).await?;
    let outcome = analyse(&state, form).await?;

    Ok(Json(AnalysisResponse {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        candidates_loaded: outcome.candidates_loaded,
        candidates_filtered: outcome.candidates_filtered,
        skipped: outcome.skipped,
        results: outcome.verdicts,
    }))
}

/// POST /api/v1/analyses/report
///
/// Same input as `handle_create_analysis`; runs a fresh analysis and responds with the
/// PDF report as a download.
pub async fn handle_analysis_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_analysis_form(multipart).await?;
    let outcome = analyse(&state, form).await?;
    pdf_download(&state, outcome.verdicts).await
}

/// POST /api/v1/reports
///
/// Renders the verdicts the caller already holds, so the PDF matches what was displayed
/// and no model call is made.
pub async fn handle_render_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    pdf_download(&state, request.results).await
}

/// GET /api/v1/candidates
///
/// Lists the resumes currently in the candidate directory.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let store = state.store.clone();
    let candidates = tokio::task::spawn_blocking(move || store.list_names())
        .await
        .context("Directory listing task panicked")??;

    Ok(Json(CandidateListResponse {
        directory: state.store.root().display().to_string(),
        candidates,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn analyse(state: &AppState, form: AnalysisForm) -> Result<AnalysisOutcome, AppError> {
    run_analysis(
        state.llm.as_ref(),
        &state.store,
        state.config.pipeline_settings(),
        &form.description,
        form.uploads,
    )
    .await
}

async fn pdf_download(
    state: &AppState,
    verdicts: Vec<Verdict>,
) -> Result<impl IntoResponse, AppError> {
    let page_config = state.page_config.clone();
    let pdf = tokio::task::spawn_blocking(move || render_report(&verdicts, &page_config))
        .await
        .context("Report rendering task panicked")??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        pdf,
    ))
}

async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("description") => {
                form.description = field.text().await.map_err(invalid_form)?;
            }
            Some("files") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(invalid_form)?;
                // An empty file input still submits one nameless, empty part.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.uploads.push(Upload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(form)
}

fn invalid_form(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {e}"))
}
