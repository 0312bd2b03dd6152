pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::resume::handlers as resume_handlers;
use crate::search::handlers as search_handlers;
use crate::state::AppState;
use crate::tracker::handlers as tracker_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI task endpoints
        .route("/api/v1/analyze", post(analysis_handlers::handle_analyze))
        .route(
            "/api/v1/prep-interview",
            post(analysis_handlers::handle_prep_interview),
        )
        .route(
            "/api/v1/write-letter",
            post(analysis_handlers::handle_write_letter),
        )
        // Resume ingestion
        .route(
            "/api/v1/read-resume",
            post(resume_handlers::handle_read_resume),
        )
        // Credit-gated search
        .route("/api/v1/search", post(search_handlers::handle_search))
        // Application tracker + stored profile
        .route(
            "/api/v1/applications",
            get(tracker_handlers::handle_list_applications)
                .post(tracker_handlers::handle_track_application),
        )
        .route(
            "/api/v1/applications/:job_id/status",
            patch(tracker_handlers::handle_update_status),
        )
        .route(
            "/api/v1/applications/:job_id",
            delete(tracker_handlers::handle_delete_application),
        )
        .route(
            "/api/v1/applications/:job_id/briefing",
            post(tracker_handlers::handle_briefing),
        )
        .route(
            "/api/v1/profile",
            get(tracker_handlers::handle_get_profile).put(tracker_handlers::handle_put_profile),
        )
        .with_state(state)
}
