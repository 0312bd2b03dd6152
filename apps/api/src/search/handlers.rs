//! Axum route handler for the search flow.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::UserIdentity;
use crate::errors::AppError;
use crate::search::orchestrator::{run_search, SearchOutcome, SearchPass};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub load_more: bool,
    /// Optional inline profile; falls back to the stored résumé text.
    #[serde(default)]
    pub user_profile: Option<String>,
}

fn default_page() -> u32 {
    1
}

/// POST /api/v1/search
///
/// Credit-gated search: dry-run check → listings fetch → batch scoring of the
/// first results → one charge. 402 with code PAYWALL when the caller is out
/// of credits. Load-more passes append a page without re-scoring or charging.
pub async fn handle_search(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError> {
    let profile = match request.user_profile {
        Some(profile) if !profile.is_empty() => profile,
        _ => state
            .tracker
            .resume_text(&identity.external_id)
            .await?
            .unwrap_or_default(),
    };

    let pass = SearchPass {
        query: request.query,
        location: request.location,
        page: request.page,
        load_more: request.load_more,
    };

    let outcome = run_search(
        state.ledger.as_ref(),
        state.jobs.as_ref(),
        state.analyzer.as_ref(),
        &identity,
        &profile,
        pass,
    )
    .await?;

    Ok(Json(outcome))
}
