//! # olasis
//!
//! Scholarly search over OpenAlex and ORCID, plus OLABOT, an LLM research
//! assistant.
//!
//! ## Modules
//!
//! - [`search`] - Combined article/specialist search with paging
//! - [`openalex`] - OpenAlex works client
//! - [`orcid`] - ORCID public API client
//! - [`chat`] - OLABOT pipeline (classifier, prompt builder, LLM gateway, sanitizer)
//! - [`server`] - HTTP API
//! - [`client`] - API client, paging state and result rendering
//! - [`i18n`] - Languages and label tables
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use olasis::{config::Config, search::SearchService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = SearchService::new(&Config::default())?;
//!     let results = service.search("machine learning", 1, None).await?;
//!     println!("Found {} articles", results.pagination.articles.total);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod i18n;
pub mod openalex;
pub mod orcid;
pub mod prompts;
pub mod search;
pub mod server;

pub use error::{OlasisError, Result};
