//! Cover-letter writing — the one free-text (non-JSON) LLM task.

use chrono::{Datelike, NaiveDate, Utc};

use crate::analysis::prompts::{
    truncate_chars, LETTER_JD_CAP, LETTER_PROFILE_CAP, LETTER_PROMPT_TEMPLATE,
};
use crate::llm_client::{LlmClient, LlmError};

/// Formats a date the way the letter must open: "Saturday, August 29, 2026".
pub fn format_letter_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        date.year()
    )
}

/// Writes a cover letter for the given job. The returned text starts with
/// today's date and contains no unfilled placeholders (enforced by prompt,
/// not post-processed).
pub async fn write_letter(
    llm: &LlmClient,
    job_description: &str,
    user_profile: &str,
    employer_name: &str,
) -> Result<String, LlmError> {
    let today = format_letter_date(Utc::now().date_naive());

    let prompt = LETTER_PROMPT_TEMPLATE
        .replace("{date}", &today)
        .replace("{employer_name}", employer_name)
        .replace(
            "{user_profile}",
            truncate_chars(user_profile, LETTER_PROFILE_CAP),
        )
        .replace(
            "{job_description}",
            truncate_chars(job_description, LETTER_JD_CAP),
        );

    llm.call_text(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_letter_date_long_form() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(format_letter_date(date), "Saturday, January 1, 2000");
    }

    #[test]
    fn test_format_letter_date_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_letter_date(date), "Thursday, March 5, 2026");
    }
}
