//! Match analysis — scores a candidate profile against a job description.
//!
//! The analyzer is a trait so the search orchestrator and the analyze handler
//! can be exercised without a live provider. Failures are explicit typed
//! errors; callers that want the legacy always-200 behavior convert them to
//! `AnalysisResult::degraded` at the boundary. Degradation is never baked
//! into the call itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{
    truncate_chars, ANALYSIS_JD_CAP, ANALYSIS_PROFILE_CAP, ANALYSIS_PROMPT_TEMPLATE,
};
use crate::llm_client::{LlmClient, LlmError};

/// Sentinel keyword carried by degraded results so clients (and tests) can
/// tell a real zero-score from a failed analysis.
pub const SENTINEL_KEYWORD: &str = "SYSTEM ERROR";

/// Per-job scoring output. Ephemeral — keyed by job id in caller memory,
/// never persisted server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: u32,
    pub key_keywords: Vec<String>,
    pub warning_log: String,
    pub attack_plan: String,
}

impl AnalysisResult {
    /// Structurally valid stand-in for a failed analysis: zero score, the
    /// sentinel keyword, and the error surfaced in the tactical field.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            match_score: 0,
            key_keywords: vec![SENTINEL_KEYWORD.to_string()],
            warning_log: "ANALYSIS FAILED".to_string(),
            attack_plan: message.into(),
        }
    }

    #[allow(dead_code)]
    pub fn is_degraded(&self) -> bool {
        self.key_keywords.iter().any(|k| k == SENTINEL_KEYWORD)
    }
}

/// The match-analyzer seam. Carried in `AppState` as `Arc<dyn MatchAnalyzer>`.
#[async_trait]
pub trait MatchAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        job_description: &str,
        user_profile: &str,
    ) -> Result<AnalysisResult, LlmError>;
}

/// Production analyzer backed by the Gemini client.
pub struct GeminiAnalyzer(pub LlmClient);

#[async_trait]
impl MatchAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        job_description: &str,
        user_profile: &str,
    ) -> Result<AnalysisResult, LlmError> {
        let prompt = ANALYSIS_PROMPT_TEMPLATE
            .replace(
                "{user_profile}",
                truncate_chars(user_profile, ANALYSIS_PROFILE_CAP),
            )
            .replace(
                "{job_description}",
                truncate_chars(job_description, ANALYSIS_JD_CAP),
            );

        self.0.call_json::<AnalysisResult>(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_deserializes_camel_case() {
        let json = r#"{
            "matchScore": 72,
            "keyKeywords": ["Rust", "Postgres", "Kubernetes"],
            "warningLog": "Missing Terraform experience.",
            "attackPlan": "Lead with the infra migration story."
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.match_score, 72);
        assert_eq!(result.key_keywords.len(), 3);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_degraded_result_shape() {
        let result = AnalysisResult::degraded("no generative model available from provider");
        assert_eq!(result.match_score, 0);
        assert_eq!(result.key_keywords, vec![SENTINEL_KEYWORD]);
        assert_eq!(result.warning_log, "ANALYSIS FAILED");
        assert!(result.is_degraded());

        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["matchScore"], 0);
        assert_eq!(wire["keyKeywords"][0], "SYSTEM ERROR");
    }
}
