use serde::{Deserialize, Serialize};

use crate::models::job::JobListing;

/// Tracked-application status. No transition ordering is enforced; any state
/// is reachable by explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Offer,
    Rejected,
}

/// One likely interview question with coaching context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingQuestion {
    pub q: String,
    pub why: String,
    pub answer: String,
}

/// Structured interview-preparation output. Cached on the owning
/// `Application` once generated so repeat requests skip the model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewBriefing {
    pub questions: Vec<BriefingQuestion>,
    pub red_flags: Vec<String>,
    pub questions_to_ask_them: Vec<String>,
}

/// A tracked job application: the job snapshot plus user-owned tracking state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(flatten)]
    pub job: JobListing,
    pub status: ApplicationStatus,
    #[serde(rename = "appliedDate")]
    pub applied_date: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub briefing: Option<InterviewBriefing>,
}
