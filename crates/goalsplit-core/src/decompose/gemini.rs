//! [`TextGenerator`] over the Google Generative Language REST API.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::TextGenerator;
use super::types::BackendError;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Default transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_OUTPUT_TOKENS: u32 = 512;

/// Longest error body kept in a [`BackendError::Status`].
const MAX_ERROR_BODY: usize = 500;

/// Environment variables holding the API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Environment variable overriding the model.
pub const MODEL_ENV_VAR: &str = "GOALSPLIT_MODEL";

/// Settings for the Gemini backend. `api_key: None` means fallback only.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Layer the current environment over `self`.
    ///
    /// - API key: `GOOGLE_API_KEY` > `GEMINI_API_KEY` > `self.api_key`
    /// - Model: `GOALSPLIT_MODEL` > `self.model`
    ///
    /// Blank values count as unset.
    pub fn with_env(&self) -> Self {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|var| non_blank_env(var))
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()));
        let model = non_blank_env(MODEL_ENV_VAR).unwrap_or_else(|| self.model.clone());
        Self {
            api_key,
            model,
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_blank_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if non-empty.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from config. Returns `None` when no API key is set.
    pub fn from_config(config: &GeminiConfig, http: reqwest::Client) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, BackendError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Transport(format!("failed to decode response body: {e}")))?;

        parsed.into_text().ok_or(BackendError::EmptyResponse)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
