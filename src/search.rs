//! Combined article/specialist search with server-side paging.
//!
//! Both sources are queried once per request for up to `fetch_limit`
//! records, concurrently. Each category is then sliced to the requested
//! page independently. An upstream failure degrades that category to an
//! empty list.

use crate::config::Config;
use crate::error::{OlasisError, Result};
use crate::openalex::{Article, OpenAlexClient};
use crate::orcid::{OrcidClient, Specialist};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Fallback corpus sizes when the live counts are unavailable
pub const FALLBACK_ARTICLE_COUNT: u64 = 200_000_000;
pub const FALLBACK_SPECIALIST_COUNT: u64 = 20_005_117;

/// Pagination metadata for one result category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub total: usize,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: usize,
    pub articles: PageInfo,
    pub specialists: PageInfo,
}

/// Body of `GET /api/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
    pub specialists: Vec<Specialist>,
    pub pagination: Pagination,
}

/// Body of `GET /api/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    pub articles: u64,
    pub specialists: u64,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Slice one page out of `items`.
///
/// `page` is 1-based; pages past the end yield an empty slice.
/// `has_prev` only looks at the page number, matching the API contract.
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: usize) -> (Vec<T>, PageInfo) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page) as u32;
    let start = (page as usize - 1).saturating_mul(per_page);

    let slice = items.into_iter().skip(start).take(per_page).collect();
    let info = PageInfo {
        total,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    };
    (slice, info)
}

/// Search facade used by the HTTP handlers and the CLI.
#[derive(Debug, Clone)]
pub struct SearchService {
    openalex: OpenAlexClient,
    orcid: OrcidClient,
    per_page: usize,
    fetch_limit: usize,
}

impl SearchService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            openalex: OpenAlexClient::new(config)?,
            orcid: OrcidClient::new(config)?,
            per_page: config.per_page,
            fetch_limit: config.fetch_limit,
        })
    }

    /// Run one search and return the requested page of both categories.
    pub async fn search(&self, query: &str, page: u32, country: Option<&str>) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OlasisError::Validation("No search query provided.".to_string()));
        }
        let page = page.max(1);

        let (articles, specialists) = tokio::join!(
            self.openalex.search(query, self.fetch_limit),
            self.orcid.search(query, self.fetch_limit, country),
        );

        let articles = articles.unwrap_or_else(|e| {
            warn!(query = query, error = %e, "Article search failed");
            Vec::new()
        });
        let specialists = specialists.unwrap_or_else(|e| {
            warn!(query = query, error = %e, "Specialist search failed");
            Vec::new()
        });

        let (articles, articles_info) = paginate(articles, page, self.per_page);
        let (specialists, specialists_info) = paginate(specialists, page, self.per_page);

        info!(
            query = query,
            page = page,
            articles_total = articles_info.total,
            specialists_total = specialists_info.total,
            "Search complete"
        );

        Ok(SearchResponse {
            articles,
            specialists,
            pagination: Pagination {
                current_page: page,
                per_page: self.per_page,
                articles: articles_info,
                specialists: specialists_info,
            },
        })
    }

    /// Live corpus sizes, with fixed fallbacks per source.
    pub async fn stats(&self) -> CorpusStats {
        let (articles, specialists) =
            tokio::join!(self.openalex.count_articles(), self.orcid.count_records());

        let mut failures = Vec::new();
        let articles = articles.unwrap_or_else(|e| {
            warn!(error = %e, "OpenAlex count unavailable");
            failures.push("openalex");
            FALLBACK_ARTICLE_COUNT
        });
        let specialists = specialists.unwrap_or_else(|e| {
            warn!(error = %e, "ORCID count unavailable");
            failures.push("orcid");
            FALLBACK_SPECIALIST_COUNT
        });

        CorpusStats {
            articles,
            specialists,
            last_updated: Local::now().to_rfc3339(),
            error: (!failures.is_empty())
                .then(|| format!("Using cached data for {}", failures.join(", "))),
        }
    }
}
