//! Interview preparation — generates a structured briefing for a tracked role.

use crate::analysis::prompts::{
    truncate_chars, INTERVIEW_JD_CAP, INTERVIEW_PROFILE_CAP, INTERVIEW_PROMPT_TEMPLATE,
};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::application::InterviewBriefing;

/// Generates a fresh briefing. Callers that hold a tracked application should
/// check the cached copy first (`ApplicationTracker::briefing_for`) — this
/// function always pays for a model call.
pub async fn prep_briefing(
    llm: &LlmClient,
    job_title: &str,
    employer: &str,
    job_description: &str,
    user_profile: &str,
) -> Result<InterviewBriefing, LlmError> {
    let prompt = INTERVIEW_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{employer}", employer)
        .replace(
            "{job_description}",
            truncate_chars(job_description, INTERVIEW_JD_CAP),
        )
        .replace(
            "{user_profile}",
            truncate_chars(user_profile, INTERVIEW_PROFILE_CAP),
        );

    llm.call_json::<InterviewBriefing>(&prompt).await
}

#[cfg(test)]
mod tests {
    use crate::models::application::InterviewBriefing;

    #[test]
    fn test_briefing_deserializes_model_shape() {
        let json = r#"{
            "questions": [
                {"q": "Why the gap in 2024?", "why": "Probing commitment", "answer": "I shipped an open-source project."}
            ],
            "red_flags": ["No Kubernetes in production"],
            "questions_to_ask_them": ["How is on-call structured?"]
        }"#;
        let briefing: InterviewBriefing = serde_json::from_str(json).unwrap();
        assert_eq!(briefing.questions.len(), 1);
        assert_eq!(briefing.questions[0].q, "Why the gap in 2024?");
        assert_eq!(briefing.red_flags.len(), 1);
    }
}
