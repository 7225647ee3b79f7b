//! LLM gateway.
//!
//! The chat pipeline talks to the model through [`LlmGateway`]; any error is
//! turned into fallback text by the caller and never reaches the user.
//! [`GeminiGateway`] implements it over the Gemini `generateContent` REST API.

use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No API key configured
    #[error("LLM credentials are not configured")]
    MissingCredentials,

    /// Transport failure or timeout
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-OK status from the model API
    #[error("LLM API error: {code} - {message}")]
    Api { code: u16, message: String },

    /// Response carried no usable text
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a completion for a fully composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Model identifier, for diagnostics
    fn model(&self) -> &str;

    /// Whether a call can succeed at all (credentials present)
    fn is_available(&self) -> bool;
}

// === Gemini REST types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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

/// Gemini `generateContent` client
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    generation: GenerationConfig,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.llm_timeout).build()?;

        if config.google_api_key.is_none() {
            warn!("GOOGLE_API_KEY is not set; OLABOT will be disabled");
        } else {
            info!(model = %config.model, "Gemini gateway initialized");
        }

        Ok(Self {
            client,
            api_key: config.google_api_key.clone(),
            model: config.model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingCredentials)?;

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.generation,
        };

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                code: status.as_u16(),
                message: error_text.chars().take(500).collect(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = extract_text(parsed);
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
        .unwrap_or_default()
}
