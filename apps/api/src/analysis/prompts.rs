// All LLM prompt constants for the AI task layer.
//
// Free-text inputs are truncated to fixed caps before interpolation to bound
// request size and per-call cost. Caps differ per task: analysis gets the
// most context, interview prep the least.

/// Profile cap for the match-analysis task.
pub const ANALYSIS_PROFILE_CAP: usize = 4000;
/// Job-description cap for the match-analysis task.
pub const ANALYSIS_JD_CAP: usize = 3000;

/// Profile cap for the cover-letter task.
pub const LETTER_PROFILE_CAP: usize = 3000;
/// Job-description cap for the cover-letter task.
pub const LETTER_JD_CAP: usize = 2000;

/// Job-description cap for the interview-prep task.
pub const INTERVIEW_JD_CAP: usize = 1500;
/// Profile cap for the interview-prep task.
pub const INTERVIEW_PROFILE_CAP: usize = 2000;

/// Match-analysis prompt. Replace `{user_profile}` and `{job_description}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a ruthless Career Sniper.
Compare this CANDIDATE against this JOB.

CANDIDATE PROFILE:
"{user_profile}"

TARGET JOB:
"{job_description}"

MISSION:
1. matchScore: Calculate a realistic % chance of getting an interview. Be strict.
2. warningLog: List SKILLS THE CANDIDATE IS MISSING. If they match perfectly, say "None."
3. attackPlan: Give 1 sentence of specific advice on how to tailor their application to bridge the gap.

STRICT JSON OUTPUT ONLY:
{
  "matchScore": number,
  "keyKeywords": ["Top 3 matching skills"],
  "warningLog": "Short warning string",
  "attackPlan": "Short tactical string"
}"#;

/// Cover-letter prompt. Replace `{date}`, `{employer_name}`, `{user_profile}`,
/// `{job_description}`.
pub const LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional Ghostwriter.

TASK: Write a Cover Letter.
DATE: {date}
EMPLOYER: {employer_name}

CANDIDATE: "{user_profile}"
JOB: "{job_description}"

RULES:
1. Start with the date: "{date}".
2. Address the hiring manager professionally.
3. Use the candidate's real name from the profile at the bottom.
4. Tone: Confident, specific, and human.
5. NO placeholders like "[Date]" or "[Company Name]". Fill them in using the data provided.

OUTPUT: Return ONLY the letter text."#;

/// Interview-briefing prompt. Replace `{job_title}`, `{employer}`,
/// `{job_description}`, `{user_profile}`.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"ACT AS: A ruthless, high-level Interview Coach.

CONTEXT:
Candidate is applying for: {job_title} at {employer}.

JOB INTEL:
"{job_description}"

CANDIDATE DOSSIER:
"{user_profile}"

MISSION:
Generate a tactical interview briefing.

OUTPUT FORMAT (Strict JSON string, no markdown code blocks):
{
  "questions": [
    {
      "q": "The likely hard question they will ask",
      "why": "Why they are asking this",
      "answer": "The perfect winning answer using the candidate's real experience"
    }
  ],
  "red_flags": ["Weakness 1 to defend", "Weakness 2 to defend"],
  "questions_to_ask_them": ["Smart question 1", "Smart question 2"]
}

Generate 3 high-probability questions."#;

/// Truncates to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
