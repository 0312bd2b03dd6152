use serde::{Deserialize, Serialize};

/// A job listing as returned by the JSearch provider. Field names match the
/// provider's wire format so listings pass through to clients unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub job_id: String,
    pub employer_name: String,
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_apply_link: Option<String>,
    #[serde(default)]
    pub job_city: Option<String>,
    #[serde(default)]
    pub job_country: Option<String>,
    #[serde(default)]
    pub job_posted_at_datetime_utc: Option<String>,
}
