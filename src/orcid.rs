//! ORCID public API client for specialist search.
//!
//! The search endpoint only returns identifiers, so every hit is resolved
//! to a display name through its public record. Record lookups run with a
//! bounded, order-preserving concurrency.

use crate::config::Config;
use crate::error::{OlasisError, OptionExt, Result};
use futures::stream::{self, StreamExt};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Maximum rows per search request (ORCID limit)
const MAX_ROWS: usize = 200;

/// Concurrent record lookups per search
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// A researcher as shown on a specialist card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specialist {
    pub orcid: Option<String>,
    pub given_names: Option<String>,
    pub family_names: Option<String>,
    pub full_name: Option<String>,
    pub profile_url: Option<String>,
}

/// Names resolved from a public ORCID record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonName {
    pub given_names: Option<String>,
    pub family_names: Option<String>,
    pub full_name: Option<String>,
}

// === ORCID API Response Types ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "num-found")]
    num_found: Option<u64>,
    #[serde(default)]
    result: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "orcid-identifier")]
    identifier: Option<OrcidIdentifier>,
}

#[derive(Debug, Deserialize)]
struct OrcidIdentifier {
    uri: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    person: Option<Person>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: Option<NameBlock>,
}

#[derive(Debug, Deserialize)]
struct NameBlock {
    #[serde(rename = "given-names")]
    given_names: Option<ValueField>,
    #[serde(rename = "family-name")]
    family_name: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: Option<String>,
}

/// ORCID search client
#[derive(Debug, Clone)]
pub struct OrcidClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrcidClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.search_timeout)
            .user_agent(format!("olasis/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OlasisError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.orcid_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search ORCID with a free-text (Lucene) query.
    ///
    /// `country`, when non-blank, restricts hits to that affiliation or
    /// address country. Hits without an identifier path are skipped.
    pub async fn search(&self, query: &str, rows: usize, country: Option<&str>) -> Result<Vec<Specialist>> {
        let search_query = build_query(query, country);
        let rows = rows.clamp(1, MAX_ROWS).to_string();

        let response: SearchResponse = self
            .get_json(
                &format!("{}/search/", self.base_url),
                &[("q", search_query.as_str()), ("rows", rows.as_str())],
            )
            .await?;

        let hits: Vec<(String, Option<String>)> = response
            .result
            .unwrap_or_default()
            .into_iter()
            .filter_map(|hit| hit.identifier)
            .filter_map(|id| {
                let path = id.path.filter(|p| !p.is_empty())?;
                let uri = id.uri.unwrap_or_else(|| format!("https://orcid.org/{}", path));
                Some((path, Some(uri)))
            })
            .collect();

        debug!(hits = hits.len(), "Resolving ORCID record names");

        let specialists: Vec<Specialist> = stream::iter(hits)
            .map(|(path, profile_url)| async move {
                let name = self.lookup_name(&path).await;
                Specialist {
                    orcid: Some(path),
                    given_names: name.given_names,
                    family_names: name.family_names,
                    full_name: name.full_name,
                    profile_url,
                }
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;

        info!(query = query, count = specialists.len(), "ORCID search complete");
        Ok(specialists)
    }

    /// Resolve the public name of one ORCID iD.
    ///
    /// Lookup failures yield an empty [`PersonName`]; the card then shows the
    /// localized "no name" label.
    pub async fn lookup_name(&self, orcid: &str) -> PersonName {
        if orcid.is_empty() {
            return PersonName::default();
        }
        let url = format!("{}/{}", self.base_url, orcid);
        match self.get_json::<RecordResponse>(&url, &[]).await {
            Ok(record) => person_name(record),
            Err(e) => {
                warn!(orcid = orcid, error = %e, "ORCID record lookup failed");
                PersonName::default()
            }
        }
    }

    /// Total number of public ORCID records.
    pub async fn count_records(&self) -> Result<u64> {
        let response: SearchResponse = self
            .get_json(&format!("{}/search/", self.base_url), &[("q", "*"), ("rows", "1")])
            .await?;
        response.num_found.ok_or_parse("ORCID response has no num-found")
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        // ORCID answers with XML unless JSON is requested explicitly
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OlasisError::Api {
                code: response.status().as_u16(),
                message: format!("ORCID API error: {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| OlasisError::Parse(format!("Failed to parse ORCID response: {}", e)))
    }
}

/// Wrap the user query with an optional country restriction
fn build_query(query: &str, country: Option<&str>) -> String {
    match country.map(str::trim).filter(|c| !c.is_empty()) {
        Some(country) => format!(
            "({}) AND (affiliation-org-name:*{}* OR address-country:\"{}\")",
            query, country, country
        ),
        None => query.to_string(),
    }
}

fn person_name(record: RecordResponse) -> PersonName {
    let name = record.person.and_then(|p| p.name);
    let (given, family) = match name {
        Some(n) => (
            n.given_names.and_then(|v| v.value).filter(|v| !v.trim().is_empty()),
            n.family_name.and_then(|v| v.value).filter(|v| !v.trim().is_empty()),
        ),
        None => (None, None),
    };

    let full_name = [given.as_deref(), family.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    PersonName {
        given_names: given,
        family_names: family,
        full_name: Some(full_name).filter(|n| !n.is_empty()),
    }
}
