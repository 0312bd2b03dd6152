// AI task layer: match analysis, cover-letter writing, interview prep.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod analyzer;
pub mod handlers;
pub mod interview;
pub mod letter;
pub mod prompts;
