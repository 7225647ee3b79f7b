//! Runtime configuration.
//!
//! The binary fills a [`Config`] from CLI flags and environment variables;
//! library code only ever sees the validated struct.

use crate::error::{OlasisError, Result};
use std::time::Duration;
use tracing::warn;

/// OpenAlex API base URL
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// ORCID public API base URL
pub const ORCID_API_BASE: &str = "https://pub.orcid.org/v3.0";

/// Gemini REST API base URL
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model for OLABOT
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Results shown per page in each grid
pub const DEFAULT_PER_PAGE: usize = 6;

/// Records fetched from each source before paging
pub const DEFAULT_FETCH_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Gemini credential; `None` disables the gateway
    pub google_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub openalex_base_url: String,
    pub orcid_base_url: String,
    pub gemini_base_url: String,
    /// Contact email for the OpenAlex polite pool
    pub openalex_mailto: Option<String>,
    pub per_page: usize,
    pub fetch_limit: usize,
    pub search_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            google_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_output_tokens: 2000,
            openalex_base_url: OPENALEX_API_BASE.to_string(),
            orcid_base_url: ORCID_API_BASE.to_string(),
            gemini_base_url: GEMINI_API_BASE.to_string(),
            openalex_mailto: None,
            per_page: DEFAULT_PER_PAGE,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            search_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Check value ranges before any client is built.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(OlasisError::Config(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(OlasisError::Config(format!(
                "top_p must be between 0.0 and 1.0, got {}",
                self.top_p
            )));
        }
        if self.per_page == 0 {
            return Err(OlasisError::Config("per_page must be at least 1".to_string()));
        }
        if !(1..=200).contains(&self.fetch_limit) {
            return Err(OlasisError::Config(format!(
                "fetch_limit must be between 1 and 200, got {}",
                self.fetch_limit
            )));
        }
        Ok(())
    }

    /// Bind address in `host:port` form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Pick the Gemini credential, accepting `GEMINI_API_KEY` as a fallback.
///
/// Blank values count as unset.
pub fn resolve_api_key(google: Option<String>, gemini: Option<String>) -> Option<String> {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    if let Some(key) = clean(google) {
        return Some(key);
    }
    if let Some(key) = clean(gemini) {
        warn!("GOOGLE_API_KEY is not set but GEMINI_API_KEY is present; using it as fallback");
        return Some(key);
    }
    warn!("No Gemini API key configured; OLABOT will answer with fallback text");
    None
}
