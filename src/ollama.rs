//! Local LLM access over the Ollama HTTP API.
//!
//! One small blocking client, shared by the triage classifier and the data
//! simulator. Model inference is the only network boundary in the crate;
//! everything that talks to it goes through the [`LlmClient`] trait so the
//! callers stay testable without a running model.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preferred models in order of preference. Small instruction-tuned models
/// are enough for binary follow-up triage and note simulation.
const PREFERRED_MODELS: &[&str] = &["tinyllama", "llama3.2:1b", "llama3.2", "llama3"];

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Ollama is not running at {0}")]
    Connection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("no compatible model available, tried: {0}")]
    NoModelAvailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),
}

/// Sampling knobs passed through to Ollama.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub num_predict: u32,
}

/// Transport seam for local LLM inference.
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError>;

    fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Pick the first preferred model that the client reports as available.
pub fn find_best_model(client: &impl LlmClient) -> Result<String, LlmError> {
    let available = client.list_models()?;
    for preferred in PREFERRED_MODELS {
        if available.iter().any(|m| m.starts_with(preferred)) {
            return Ok((*preferred).to_string());
        }
    }
    Err(LlmError::NoModelAvailable(PREFERRED_MODELS.join(", ")))
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with a 5-minute timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", 300)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerationOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Strip `<think>` blocks some reasoning models wrap around their answer.
pub fn strip_reasoning_markers(response: &str) -> String {
    static THINK_BLOCK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());
    THINK_BLOCK.replace_all(response, "").trim().to_string()
}
