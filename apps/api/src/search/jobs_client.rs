//! Job-listings client for the JSearch API (RapidAPI).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::job::JobListing;

pub const DEFAULT_BASE_URL: &str = "https://jsearch.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "jsearch.p.rapidapi.com";

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<JobListing>,
}

/// The job-listings seam. Carried in `AppState` as `Arc<dyn JobSource>`.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        location: Option<&str>,
        page: u32,
    ) -> Result<Vec<JobListing>, JobSearchError>;
}

/// Production client against JSearch.
pub struct JSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JSearchClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

/// Folds the location into the query string the way the provider expects.
/// No location means a remote-first search.
pub fn build_query(query: &str, location: Option<&str>) -> String {
    match location {
        Some(loc) if !loc.trim().is_empty() => format!("{query} in {loc}"),
        _ => format!("{query} Remote"),
    }
}

#[async_trait]
impl JobSource for JSearchClient {
    async fn search(
        &self,
        query: &str,
        location: Option<&str>,
        page: u32,
    ) -> Result<Vec<JobListing>, JobSearchError> {
        let full_query = build_query(query, location);
        debug!(query = %full_query, page, "Fetching job listings");

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("query", full_query.as_str()),
                ("page", &page.to_string()),
                ("num_pages", "1"),
                ("date_posted", "month"),
            ])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.data)
    }
}
