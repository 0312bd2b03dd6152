//! Axum route handlers for the AI task endpoints.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::analysis::interview::prep_briefing;
use crate::analysis::letter::write_letter;
use crate::auth::UserIdentity;
use crate::credits::LedgerError;
use crate::errors::AppError;
use crate::models::application::InterviewBriefing;
use crate::state::AppState;

/// Request `type` marker for the dry-run branch of the analyze endpoint.
pub const CREDIT_CHECK_TYPE: &str = "CREDIT_CHECK";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub user_profile: String,
    #[serde(rename = "type", default)]
    pub request_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepInterviewRequest {
    pub job_title: String,
    pub employer: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub user_profile: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteLetterRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub user_profile: String,
    pub employer_name: String,
}

#[derive(Debug, Serialize)]
pub struct WriteLetterResponse {
    pub letter: String,
}

/// POST /api/v1/analyze
///
/// Two modes share this endpoint:
/// - `type = "CREDIT_CHECK"`: dry-run paywall pre-flight; never charges.
/// - default: the paid analysis flow. The balance is checked before the model
///   call and charged only after it succeeds; a failed call returns a
///   degraded-but-valid result (HTTP 200) and leaves the balance untouched.
pub async fn handle_analyze(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    let user = state.ledger.get_or_create(&identity).await?;

    if request.request_type.as_deref() == Some(CREDIT_CHECK_TYPE) {
        if user.credits <= 0 {
            return Err(AppError::InsufficientCredits);
        }
        return Ok(Json(json!({ "success": true, "credits": user.credits })).into_response());
    }

    if user.credits <= 0 {
        return Err(AppError::InsufficientCredits);
    }

    let result = match state
        .analyzer
        .analyze(&request.job_description, &request.user_profile)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Degrade instead of erroring so the endpoint stays available;
            // no charge for a failed call.
            warn!("Analysis failed: {e}");
            return Ok(
                Json(crate::analysis::analyzer::AnalysisResult::degraded(e.to_string()))
                    .into_response(),
            );
        }
    };

    match state.ledger.charge(user.id).await {
        Ok(_) => {}
        // Balance drained between check and charge; the result is already
        // paid for in provider cost, so return it and let the next request
        // hit the paywall.
        Err(LedgerError::InsufficientCredits) => {
            warn!(user_id = %user.id, "Charge raced to zero after successful analysis")
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(result).into_response())
}

/// POST /api/v1/prep-interview
///
/// Generates an interview briefing. Stateless: callers holding a tracked
/// application should prefer the tracker endpoint, which caches.
pub async fn handle_prep_interview(
    State(state): State<AppState>,
    Json(request): Json<PrepInterviewRequest>,
) -> Result<Json<InterviewBriefing>, AppError> {
    let briefing = prep_briefing(
        &state.llm,
        &request.job_title,
        &request.employer,
        &request.job_description,
        &request.user_profile,
    )
    .await
    .map_err(|e| AppError::Llm(format!("Briefing generation failed: {e}")))?;

    Ok(Json(briefing))
}

/// POST /api/v1/write-letter
///
/// Writes a cover letter. The text opens with today's date and is addressed
/// professionally, with no unfilled placeholders.
pub async fn handle_write_letter(
    State(state): State<AppState>,
    Json(request): Json<WriteLetterRequest>,
) -> Result<Json<WriteLetterResponse>, AppError> {
    let letter = write_letter(
        &state.llm,
        &request.job_description,
        &request.user_profile,
        &request.employer_name,
    )
    .await
    .map_err(|e| AppError::Llm(format!("Letter generation failed: {e}")))?;

    Ok(Json(WriteLetterResponse { letter }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::analysis::analyzer::{AnalysisResult, MatchAnalyzer, SENTINEL_KEYWORD};
    use crate::credits::{CreditLedger, MemoryCreditLedger};
    use crate::llm_client::{LlmClient, LlmError};
    use crate::models::job::JobListing;
    use crate::search::jobs_client::{JobSearchError, JobSource};
    use crate::tracker::store::MemoryStore;
    use crate::tracker::ApplicationTracker;

    struct StubAnalyzer {
        calls: Arc<AtomicU64>,
        fail: bool,
    }

    #[async_trait]
    impl MatchAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _job_description: &str,
            _user_profile: &str,
        ) -> Result<AnalysisResult, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LlmError::NoModelAvailable)
            } else {
                Ok(AnalysisResult {
                    match_score: 64,
                    key_keywords: vec!["Rust".to_string()],
                    warning_log: "None.".to_string(),
                    attack_plan: "Emphasize systems work.".to_string(),
                })
            }
        }
    }

    struct NoJobs;

    #[async_trait]
    impl JobSource for NoJobs {
        async fn search(
            &self,
            _query: &str,
            _location: Option<&str>,
            _page: u32,
        ) -> Result<Vec<JobListing>, JobSearchError> {
            Ok(vec![])
        }
    }

    struct NoExtract;

    impl crate::resume::extract::TextExtractor for NoExtract {
        fn extract_text(
            &self,
            _bytes: &[u8],
        ) -> Result<String, crate::resume::extract::ExtractError> {
            Ok(String::new())
        }
    }

    fn test_state(
        ledger: Arc<MemoryCreditLedger>,
        fail_analysis: bool,
    ) -> (AppState, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        let state = AppState {
            llm: LlmClient::new("test-key".to_string()),
            ledger,
            jobs: Arc::new(NoJobs),
            analyzer: Arc::new(StubAnalyzer {
                calls: calls.clone(),
                fail: fail_analysis,
            }),
            extractor: Arc::new(NoExtract),
            tracker: ApplicationTracker::new(Arc::new(MemoryStore::new())),
            config: crate::config::Config {
                database_url: String::new(),
                gemini_api_key: String::new(),
                jsearch_api_key: String::new(),
                port: 0,
                rust_log: "info".to_string(),
            },
        };
        (state, calls)
    }

    fn identity() -> UserIdentity {
        UserIdentity {
            external_id: "ext-1".to_string(),
            email: "ext-1@example.com".to_string(),
        }
    }

    fn analyze_request(request_type: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest {
            job_description: "Build distributed systems.".to_string(),
            user_profile: "Ten years of Rust.".to_string(),
            request_type: request_type.map(str::to_string),
        }
    }

    async fn remaining(ledger: &MemoryCreditLedger) -> i32 {
        let user = ledger.get_or_create(&identity()).await.unwrap();
        ledger.check(user.id).await.unwrap().remaining
    }

    #[tokio::test]
    async fn test_credit_check_reports_balance_without_charging() {
        let ledger = Arc::new(MemoryCreditLedger::new());
        let (state, calls) = test_state(ledger.clone(), false);

        let response = handle_analyze(
            State(state),
            identity(),
            Json(analyze_request(Some(CREDIT_CHECK_TYPE))),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["credits"], 3);

        assert_eq!(remaining(&ledger).await, 3);
        assert_eq!(ledger.charge_attempts.load(Ordering::SeqCst), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_credit_check_paywalls_at_zero_without_charging() {
        let ledger = Arc::new(MemoryCreditLedger::new());
        ledger.get_or_create(&identity()).await.unwrap();
        ledger.set_credits("ext-1", 0).await;
        let (state, _) = test_state(ledger.clone(), false);

        let err = handle_analyze(
            State(state),
            identity(),
            Json(analyze_request(Some(CREDIT_CHECK_TYPE))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InsufficientCredits));

        assert_eq!(remaining(&ledger).await, 0);
        assert_eq!(ledger.charge_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_analyze_charges_exactly_one() {
        let ledger = Arc::new(MemoryCreditLedger::new());
        let (state, calls) = test_state(ledger.clone(), false);

        let response = handle_analyze(State(state), identity(), Json(analyze_request(None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let result: AnalysisResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.match_score, 64);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(remaining(&ledger).await, 2);
    }

    #[tokio::test]
    async fn test_failed_analyze_degrades_and_does_not_charge() {
        let ledger = Arc::new(MemoryCreditLedger::new());
        let (state, calls) = test_state(ledger.clone(), true);

        let response = handle_analyze(State(state), identity(), Json(analyze_request(None)))
            .await
            .unwrap();
        // Degraded result rides a 200 so the endpoint stays available.
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let result: AnalysisResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.match_score, 0);
        assert_eq!(result.key_keywords, vec![SENTINEL_KEYWORD]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Failed call never charges.
        assert_eq!(remaining(&ledger).await, 3);
        assert_eq!(ledger.charge_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_analyze_is_a_paywall_before_the_model_call() {
        let ledger = Arc::new(MemoryCreditLedger::new());
        ledger.get_or_create(&identity()).await.unwrap();
        ledger.set_credits("ext-1", 0).await;
        let (state, calls) = test_state(ledger.clone(), false);

        let err = handle_analyze(State(state), identity(), Json(analyze_request(None)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientCredits));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(remaining(&ledger).await, 0);
    }
}
