use std::sync::Arc;

use crate::analysis::analyzer::MatchAnalyzer;
use crate::config::Config;
use crate::credits::CreditLedger;
use crate::llm_client::LlmClient;
use crate::resume::extract::TextExtractor;
use crate::search::jobs_client::JobSource;
use crate::tracker::ApplicationTracker;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every backend sits behind a trait object so handlers can be
/// exercised against in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Paywall gate. Constructed once in `main` — no module-level singleton.
    pub ledger: Arc<dyn CreditLedger>,
    pub jobs: Arc<dyn JobSource>,
    pub analyzer: Arc<dyn MatchAnalyzer>,
    pub extractor: Arc<dyn TextExtractor>,
    pub tracker: ApplicationTracker,
    /// Kept for handlers that need runtime settings; currently read only at startup.
    #[allow(dead_code)]
    pub config: Config,
}
