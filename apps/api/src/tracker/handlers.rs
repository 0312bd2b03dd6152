//! Axum route handlers for the application tracker and the stored profile.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::interview::prep_briefing;
use crate::auth::UserIdentity;
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus, InterviewBriefing};
use crate::models::job::JobListing;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileBody {
    pub text: String,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = state.tracker.list(&identity.external_id).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// POST /api/v1/applications
///
/// Tracks a job. Adding an already-tracked job returns the existing record
/// unchanged (dedupe by job id).
pub async fn handle_track_application(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(job): Json<JobListing>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let app = state.tracker.add(&identity.external_id, job).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

/// PATCH /api/v1/applications/:job_id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Application>, AppError> {
    state
        .tracker
        .update_status(&identity.external_id, &job_id, request.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Application {job_id} not tracked")))
}

/// DELETE /api/v1/applications/:job_id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(job_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.tracker.delete(&identity.external_id, &job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Application {job_id} not tracked")))
    }
}

/// POST /api/v1/applications/:job_id/briefing
///
/// Returns the interview briefing for a tracked application. Generated once
/// and cached on the application; repeat requests return the stored copy
/// without another model call.
pub async fn handle_briefing(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(job_id): Path<String>,
) -> Result<Json<InterviewBriefing>, AppError> {
    let app = state
        .tracker
        .find(&identity.external_id, &job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {job_id} not tracked")))?;

    if let Some(briefing) = app.briefing {
        info!(job_id = %job_id, "Returning cached briefing");
        return Ok(Json(briefing));
    }

    let profile = state
        .tracker
        .resume_text(&identity.external_id)
        .await?
        .unwrap_or_default();

    let briefing = prep_briefing(
        &state.llm,
        &app.job.job_title,
        &app.job.employer_name,
        &app.job.job_description,
        &profile,
    )
    .await
    .map_err(|e| AppError::Llm(format!("Briefing generation failed: {e}")))?;

    state
        .tracker
        .attach_briefing(&identity.external_id, &job_id, briefing.clone())
        .await?;

    Ok(Json(briefing))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> Result<Json<ProfileBody>, AppError> {
    let text = state
        .tracker
        .resume_text(&identity.external_id)
        .await?
        .unwrap_or_default();
    Ok(Json(ProfileBody { text }))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(body): Json<ProfileBody>,
) -> Result<StatusCode, AppError> {
    state
        .tracker
        .set_resume_text(&identity.external_id, &body.text)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
