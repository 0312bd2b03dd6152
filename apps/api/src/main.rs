mod analysis;
mod auth;
mod config;
mod credits;
mod db;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod search;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::GeminiAnalyzer;
use crate::config::Config;
use crate::credits::PgCreditLedger;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resume::extract::PdfTextExtractor;
use crate::routes::build_router;
use crate::search::jobs_client::JSearchClient;
use crate::state::AppState;
use crate::tracker::store::PgKeyValueStore;
use crate::tracker::ApplicationTracker;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Headhunter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client (model resolved per call via discovery)
    let llm = LlmClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized");

    // Job-listings client
    let jobs = Arc::new(JSearchClient::new(config.jsearch_api_key.clone()));
    info!("Job search client initialized");

    // Credit ledger — one instance per process, shared by reference
    let ledger = Arc::new(PgCreditLedger::new(db.clone()));

    // Tracker over the Postgres key-value store
    let tracker = ApplicationTracker::new(Arc::new(PgKeyValueStore::new(db)));

    // Build app state
    let state = AppState {
        analyzer: Arc::new(GeminiAnalyzer(llm.clone())),
        extractor: Arc::new(PdfTextExtractor),
        llm,
        ledger,
        jobs,
        tracker,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
