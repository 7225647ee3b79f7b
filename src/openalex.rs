//! OpenAlex API Client
//!
//! Article search for the OLASIS result grid. `search=<query>` performs a
//! full-text search across titles, abstracts and full text; records are
//! reduced to the handful of fields the cards show.
//!
//! API notes (per OpenAlex docs):
//! - Use `mailto:email` parameter for the polite pool
//! - `per-page` accepts 1..=200

use crate::config::Config;
use crate::error::{OlasisError, OptionExt, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maximum results per page (OpenAlex limit)
const MAX_PER_PAGE: usize = 200;

/// A scholarly work as shown on an article card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub openalex_id: Option<String>,
}

/// OpenAlex API response structures
#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    meta: Option<OpenAlexMeta>,
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexMeta {
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    id: Option<String>,
    title: Option<String>,
    display_name: Option<String>,
    publication_year: Option<i32>,
    doi: Option<String>,
    authorships: Option<Vec<OpenAlexAuthorship>>,
    primary_location: Option<OpenAlexLocation>,
    best_oa_location: Option<OpenAlexLocation>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthorship {
    author: Option<OpenAlexAuthor>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexLocation {
    landing_page_url: Option<String>,
}

/// OpenAlex works client
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    client: Client,
    base_url: String,
    mailto: Option<String>,
}

impl OpenAlexClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = match &config.openalex_mailto {
            Some(email) => format!("olasis/{} (mailto:{})", env!("CARGO_PKG_VERSION"), email),
            None => format!("olasis/{}", env!("CARGO_PKG_VERSION")),
        };
        let client = Client::builder()
            .timeout(config.search_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| OlasisError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.openalex_base_url.trim_end_matches('/').to_string(),
            mailto: config.openalex_mailto.clone(),
        })
    }

    /// Search OpenAlex for works matching `query`.
    ///
    /// `per_page` is clamped to the API's 1..=200 range. A single request is
    /// made; any failure is returned to the caller.
    pub async fn search(&self, query: &str, per_page: usize) -> Result<Vec<Article>> {
        let url = build_search_url(&self.base_url, query, per_page, self.mailto.as_deref());
        debug!(url = %url, "Fetching OpenAlex works");

        let body = self.fetch(&url).await?;
        let articles = parse_response(&body)?;

        info!(query = query, count = articles.len(), "OpenAlex search complete");
        Ok(articles)
    }

    /// Total number of journal articles indexed by OpenAlex.
    pub async fn count_articles(&self) -> Result<u64> {
        let url = format!("{}/works?filter=type:article&per-page=1", self.base_url);
        let body = self.fetch(&url).await?;
        let response: OpenAlexResponse = serde_json::from_str(&body)
            .map_err(|e| OlasisError::Parse(format!("Failed to parse OpenAlex response: {}", e)))?;
        response
            .meta
            .and_then(|m| m.count)
            .ok_or_parse("OpenAlex response has no meta.count")
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(OlasisError::Api {
                code: status.as_u16(),
                message: format!("OpenAlex API error: {}", status),
            });
        }

        response.text().await.map_err(OlasisError::Network)
    }
}

/// Build OpenAlex API search URL
fn build_search_url(base_url: &str, query: &str, per_page: usize, mailto: Option<&str>) -> String {
    let mut url = format!(
        "{}/works?search={}&per-page={}",
        base_url,
        urlencoding::encode(query),
        per_page.clamp(1, MAX_PER_PAGE),
    );

    if let Some(email) = mailto {
        url.push_str(&format!("&mailto={}", urlencoding::encode(email)));
    }

    url
}

/// Parse OpenAlex API response
fn parse_response(json_str: &str) -> Result<Vec<Article>> {
    let response: OpenAlexResponse = serde_json::from_str(json_str)
        .map_err(|e| OlasisError::Parse(format!("Failed to parse OpenAlex response: {}", e)))?;

    Ok(response.results.into_iter().map(article_from_work).collect())
}

fn article_from_work(work: OpenAlexWork) -> Article {
    let title = work
        .display_name
        .or(work.title)
        .filter(|t| !t.trim().is_empty());

    let authors = work
        .authorships
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| a.author)
        .filter_map(|a| a.display_name)
        .filter(|name| !name.trim().is_empty())
        .collect();

    // Landing page: primary location first, then best open-access copy
    let url = work
        .primary_location
        .and_then(|l| l.landing_page_url)
        .or_else(|| work.best_oa_location.and_then(|l| l.landing_page_url));

    Article {
        title,
        authors,
        year: work.publication_year,
        doi: work.doi,
        url,
        openalex_id: work.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url() {
        let url = build_search_url(
            "https://api.openalex.org",
            "machine learning",
            50,
            Some("team@olasis.org"),
        );
        assert!(url.starts_with("https://api.openalex.org/works?"));
        assert!(url.contains("search=machine%20learning"));
        assert!(url.contains("per-page=50"));
        assert!(url.contains("mailto=team%40olasis.org"));
    }

    #[test]
    fn test_build_search_url_clamps_per_page() {
        let url = build_search_url("http://x", "q", 1000, None);
        assert!(url.contains("per-page=200"));
        assert!(!url.contains("mailto"));
        let url = build_search_url("http://x", "q", 0, None);
        assert!(url.contains("per-page=1"));
    }

    #[test]
    fn test_parse_response_maps_fields() {
        let body = r#"{
            "meta": {"count": 2},
            "results": [
                {
                    "id": "https://openalex.org/W1",
                    "display_name": "Deep Learning",
                    "publication_year": 2015,
                    "doi": "https://doi.org/10.1038/nature14539",
                    "authorships": [
                        {"author": {"display_name": "Yann LeCun"}},
                        {"author": {"display_name": "Yoshua Bengio"}},
                        {"author": {}}
                    ],
                    "primary_location": {"landing_page_url": null},
                    "best_oa_location": {"landing_page_url": "https://example.org/oa"}
                },
                {"id": "https://openalex.org/W2", "title": "", "authorships": null}
            ]
        }"#;

        let articles = parse_response(body).unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title.as_deref(), Some("Deep Learning"));
        assert_eq!(first.authors, vec!["Yann LeCun", "Yoshua Bengio"]);
        assert_eq!(first.year, Some(2015));
        assert_eq!(first.doi.as_deref(), Some("https://doi.org/10.1038/nature14539"));
        assert_eq!(first.url.as_deref(), Some("https://example.org/oa"));

        let second = &articles[1];
        assert!(second.title.is_none());
        assert!(second.authors.is_empty());
        assert!(second.url.is_none());
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(matches!(parse_response("<html>"), Err(OlasisError::Parse(_))));
    }
}
