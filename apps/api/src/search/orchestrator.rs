//! Search orchestration: credit gate → listings fetch → batch reconnaissance.
//!
//! One logical pass per user action. The scoring batch runs sequentially —
//! at most `BATCH_RECON_SIZE` outbound AI calls per search, one at a time,
//! which bounds provider load and keeps rate-limit handling trivial at the
//! cost of linear latency.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::analyzer::{AnalysisResult, MatchAnalyzer};
use crate::auth::UserIdentity;
use crate::credits::{CreditLedger, LedgerError};
use crate::errors::AppError;
use crate::models::job::JobListing;
use crate::search::jobs_client::JobSource;

/// How many leading results get auto-scored on a fresh search.
pub const BATCH_RECON_SIZE: usize = 3;

/// Parameters of one search pass.
#[derive(Debug, Clone)]
pub struct SearchPass {
    pub query: String,
    pub location: Option<String>,
    pub page: u32,
    /// Load-more appends a page without re-scoring and without a new charge.
    pub load_more: bool,
}

/// Terminal outcome of a search pass.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Results {
        jobs: Vec<JobListing>,
        /// Per-job analyses keyed by job id. Empty on load-more passes and
        /// when no profile is on file.
        analyses: HashMap<String, AnalysisResult>,
        #[serde(rename = "creditsRemaining")]
        credits_remaining: i32,
        page: u32,
    },
    Empty {
        jobs: Vec<JobListing>,
        page: u32,
    },
}

/// Runs one search pass end to end.
///
/// Ordering is deliberate: the dry-run credit check happens before the fetch
/// (so an exhausted user costs nothing), and the single charge lands only
/// after the fetch succeeded. Individual scoring failures degrade per job and
/// never abort the batch or void the charge.
pub async fn run_search(
    ledger: &dyn CreditLedger,
    jobs: &dyn JobSource,
    analyzer: &dyn MatchAnalyzer,
    identity: &UserIdentity,
    user_profile: &str,
    pass: SearchPass,
) -> Result<SearchOutcome, AppError> {
    if pass.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let user = ledger.get_or_create(identity).await?;

    // Dry-run gate: pre-flight the paywall before spending anything.
    let status = ledger.check(user.id).await?;
    if !status.ok {
        return Err(AppError::InsufficientCredits);
    }

    let listings = jobs
        .search(&pass.query, pass.location.as_deref(), pass.page)
        .await
        .map_err(|e| AppError::JobSearch(e.to_string()))?;

    if listings.is_empty() {
        return Ok(SearchOutcome::Empty {
            jobs: vec![],
            page: pass.page,
        });
    }

    // Batch reconnaissance: fresh searches only, and only with a profile to
    // score against. Sequential by design.
    let mut analyses = HashMap::new();
    if !pass.load_more && !user_profile.is_empty() {
        for job in listings.iter().take(BATCH_RECON_SIZE) {
            let result = match analyzer.analyze(&job.job_description, user_profile).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(job_id = %job.job_id, "Batch analysis failed: {e}");
                    AnalysisResult::degraded(e.to_string())
                }
            };
            analyses.insert(job.job_id.clone(), result);
        }
    }

    // Charge once per successful fresh search. Load-more pages ride on the
    // already-paid search.
    let credits_remaining = if pass.load_more {
        status.remaining
    } else {
        match ledger.charge(user.id).await {
            Ok(user) => user.credits,
            // The dry-run passed but the balance drained in between; the
            // work is already done, so surface the paywall for next time.
            Err(LedgerError::InsufficientCredits) => 0,
            Err(e) => return Err(e.into()),
        }
    };

    info!(
        count = listings.len(),
        scored = analyses.len(),
        page = pass.page,
        "Search pass complete"
    );

    Ok(SearchOutcome::Results {
        jobs: listings,
        analyses,
        credits_remaining,
        page: pass.page,
    })
}
