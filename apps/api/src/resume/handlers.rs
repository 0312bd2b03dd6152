//! Axum route handler for resume ingestion.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::extract::read_resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResumeRequest {
    pub file_data: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct ReadResumeResponse {
    pub text: String,
}

/// POST /api/v1/read-resume
///
/// Extracts the text layer from an uploaded PDF. Non-PDF uploads and
/// near-empty text layers (scanned documents) are rejected with a
/// human-readable message.
pub async fn handle_read_resume(
    State(state): State<AppState>,
    Json(request): Json<ReadResumeRequest>,
) -> Result<Json<ReadResumeResponse>, AppError> {
    let text = read_resume(
        state.extractor.as_ref(),
        &request.file_data,
        &request.mime_type,
    )
    .map_err(|e| AppError::ResumeParse(e.to_string()))?;

    Ok(Json(ReadResumeResponse { text }))
}
