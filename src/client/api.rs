//! HTTP client for a running OLASIS server.

use crate::error::{OlasisError, Result};
use crate::i18n::Language;
use crate::search::SearchResponse;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
    lang: Language,
    reset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

/// Servers answer with `response`; some deployments use `message`.
#[derive(Debug, Deserialize)]
struct ChatAnswer {
    response: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OlasisClient {
    client: Client,
    base_url: String,
}

impl OlasisClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("olasis-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OlasisError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/search`. Any non-OK status is an error.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchResponse> {
        let url = format!("{}/api/search", self.base_url);
        debug!(query = query, page = page, "Requesting search page");
        let page = page.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("page", page.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OlasisError::Api {
                code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| OlasisError::Parse(format!("Failed to parse search response: {}", e)))
    }

    /// `POST /api/chat`, returning the reply text.
    pub async fn chat(&self, message: &str, lang: Language, reset: bool, session_id: Option<&str>) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ChatBody {
                message,
                lang,
                reset,
                session_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OlasisError::Api {
                code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let answer: ChatAnswer = response
            .json()
            .await
            .map_err(|e| OlasisError::Parse(format!("Failed to parse chat response: {}", e)))?;

        answer
            .response
            .or(answer.message)
            .ok_or_else(|| OlasisError::Parse("Chat response has no text".to_string()))
    }
}
