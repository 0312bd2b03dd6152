/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the generative-language API
/// directly. All LLM interactions MUST go through this module.
///
/// The model is not hardcoded: the provider rotates identifiers, so each call
/// lists the available models and picks the first entry of the gemini family
/// that advertises `generateContent` support.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Identifier fragment marking the generative model family we accept.
const MODEL_FAMILY_MARKER: &str = "gemini";
const GENERATE_CONTENT_METHOD: &str = "generateContent";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no generative model available from provider")]
    NoModelAvailable,

    #[error("malformed model output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Extracts the text of the first candidate's first part.
    fn text(mut self) -> Option<String> {
        self.candidates
            .drain(..)
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all tasks. Wraps model discovery and the
/// `generateContent` endpoint. Every outbound call is attempted exactly once;
/// retry policy belongs to the caller, and no caller retries today.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Base URL override for tests and self-hosted proxies.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Lists available models and selects the first gemini-family entry that
    /// supports content generation. `NoModelAvailable` aborts the calling
    /// operation before any generation cost is incurred.
    pub async fn resolve_model(&self) -> Result<String, LlmError> {
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let list: ModelListResponse = response.json().await?;
        let model = list
            .models
            .into_iter()
            .find(|m| {
                m.name.contains(MODEL_FAMILY_MARKER)
                    && m.supported_generation_methods
                        .iter()
                        .any(|method| method == GENERATE_CONTENT_METHOD)
            })
            .ok_or(LlmError::NoModelAvailable)?;

        debug!("Resolved generative model: {}", model.name);
        Ok(model.name)
    }

    /// Sends a single generation request against an already-resolved model
    /// and returns the first candidate's text.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        generated.text().ok_or(LlmError::EmptyContent)
    }

    /// Resolves a model and runs one generation, returning raw text.
    pub async fn call_text(&self, prompt: &str) -> Result<String, LlmError> {
        let model = self.resolve_model().await?;
        self.generate(&model, prompt).await
    }

    /// Resolves a model, runs one generation, and deserializes the text as
    /// JSON. The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, LlmError> {
        let text = self.call_text(prompt).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::MalformedOutput)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
