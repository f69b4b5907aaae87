//! Axum route handlers for the Review API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::checklist::{build_presence_checklist, ChecklistItem};
use crate::review::metrics::{MetricConfig, METRIC_CONFIG};
use crate::review::report::ReportView;
use crate::review::run_review;
use crate::sessions::Session;
use crate::state::AppState;

/// The only content type accepted for uploads.
const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChecklistRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub request_id: Uuid,
    pub report: ReportView,
}

struct UploadedFile {
    file_name: String,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/ready
pub async fn handle_ready(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "ready": state.readiness.is_ready() }))
}

/// GET /api/v1/metrics
pub async fn handle_metric_config() -> Json<[MetricConfig; 4]> {
    Json(METRIC_CONFIG)
}

/// POST /api/v1/checklist
///
/// Local presence checklist only; no LLM call.
pub async fn handle_checklist(Json(request): Json<ChecklistRequest>) -> Json<Vec<ChecklistItem>> {
    Json(build_presence_checklist(&request.text))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<Session>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// DELETE /api/v1/sessions/:id
///
/// "New analysis": drops the current result and any in-flight upload.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.reset(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/upload
///
/// Full pipeline: validate → extract → checklist → LLM review → parse → report.
/// Non-PDF uploads are rejected before the session is touched. Any review
/// failure resets the session; a result from a superseded upload is discarded
/// and reported as a conflict.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    if state.sessions.get(id).await.is_none() {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    if !state.readiness.is_ready() {
        return Err(AppError::NotReady);
    }

    let file = read_pdf_field(multipart).await?;
    let request_id = state
        .sessions
        .begin_upload(id, &file.file_name)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    info!(
        "Session {id}: reviewing '{}' ({} bytes) as request {request_id}",
        file.file_name,
        file.bytes.len()
    );

    let outcome = match run_review(
        state.extractor.as_ref(),
        state.chat.as_ref(),
        file.bytes,
        state.config.json_extraction,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            state.sessions.fail(id, request_id).await;
            return Err(e.into());
        }
    };

    let report = ReportView::build(&file.file_name, outcome.analysis, outcome.checklist);
    if !state.sessions.complete(id, request_id, report.clone()).await {
        warn!("Session {id}: request {request_id} finished after being superseded");
        return Err(AppError::Conflict(
            "Upload was superseded by a newer upload or a reset".to_string(),
        ));
    }

    Ok(Json(UploadResponse {
        session_id: id,
        request_id,
        report,
    }))
}

/// Pulls the `file` field out of the form, rejecting anything not declared as a PDF.
async fn read_pdf_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::UnsupportedMediaType("PDF only.".to_string()));
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile { file_name, bytes });
    }
    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in multipart form"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
