//! olasis - scholarly search and the OLABOT research assistant
//!
//! ## Usage
//!
//! ### HTTP Server Mode
//! ```bash
//! olasis serve --port 8080
//! ```
//!
//! ### CLI Mode
//! ```bash
//! olasis search "machine learning" --page 2 --output ./out
//! olasis browse "machine learning" --server http://localhost:8080
//! olasis chat --lang pt
//! olasis lang en
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use olasis::chat::{GeminiGateway, OlaBot};
use olasis::client::{Category, ChatSession, Direction, FetchTicket, OlasisClient, PreferenceStore, SearchSession};
use olasis::config::{self, Config};
use olasis::i18n::Language;
use olasis::openalex::Article;
use olasis::orcid::Specialist;
use olasis::search::SearchService;
use olasis::server::{router, AppState};
use serde::Serialize;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SERVER: &str = "http://localhost:8080";

// ============================================================================
// CLI Definition
// ============================================================================

/// OLASIS - articles, specialists and OLABOT
#[derive(Parser)]
#[command(name = "olasis")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Gemini API key
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        google_api_key: Option<String>,

        /// Legacy name for the Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        gemini_api_key: Option<String>,

        #[arg(long, env = "OLABOT_MODEL", default_value = config::DEFAULT_MODEL)]
        model: String,

        /// Sampling temperature (0.0 - 1.0)
        #[arg(long, default_value = "0.7")]
        temperature: f32,

        /// Contact email for the OpenAlex polite pool
        #[arg(long, env = "OPENALEX_MAILTO")]
        mailto: Option<String>,
    },

    /// Search articles and specialists directly against OpenAlex and ORCID
    Search {
        /// Search keywords
        query: String,

        #[arg(long, default_value = "1")]
        page: u32,

        /// Restrict specialists to a country
        #[arg(long)]
        country: Option<String>,

        /// Display language (es, en, pt); defaults to the saved preference
        #[arg(long)]
        lang: Option<Language>,

        /// Write articles.csv and specialists.csv into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, env = "OPENALEX_MAILTO")]
        mailto: Option<String>,
    },

    /// Page through results from a running server
    Browse {
        /// Initial query
        query: Option<String>,

        /// Server base URL; defaults to the saved one
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        lang: Option<Language>,
    },

    /// Chat with OLABOT through a running server
    Chat {
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        lang: Option<Language>,
    },

    /// Show or set the saved display language
    Lang {
        /// es, en or pt
        code: Option<Language>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            google_api_key,
            gemini_api_key,
            model,
            temperature,
            mailto,
        } => {
            let config = Config {
                host,
                port,
                google_api_key: config::resolve_api_key(google_api_key, gemini_api_key),
                model,
                temperature,
                openalex_mailto: mailto,
                ..Default::default()
            };
            run_server(config).await
        }
        Commands::Search {
            query,
            page,
            country,
            lang,
            output,
            mailto,
        } => run_search(query, page, country, lang, output, mailto).await,
        Commands::Browse { query, server, lang } => run_browse(query, server, lang).await,
        Commands::Chat { server, lang } => run_chat(server, lang).await,
        Commands::Lang { code } => handle_lang(code),
    }
}

fn preferences() -> PreferenceStore {
    PreferenceStore::new().unwrap_or_else(|_| PreferenceStore::with_path(PathBuf::from(".olasis_prefs.json")))
}

/// Explicit flags win over saved preferences. A new server URL is saved.
fn resolve_client_settings(server: Option<String>, lang: Option<Language>) -> Result<(String, Language)> {
    let store = preferences();
    let mut prefs = store.load();
    let language = lang.unwrap_or(prefs.language);

    let server = match server {
        Some(url) => {
            if prefs.server.as_deref() != Some(url.as_str()) {
                prefs.server = Some(url.clone());
                store.save(&prefs).context("Failed to save preferences")?;
            }
            url
        }
        None => prefs.server.clone().unwrap_or_else(|| DEFAULT_SERVER.to_string()),
    };
    Ok((server, language))
}

// ============================================================================
// Search
// ============================================================================

#[derive(Serialize)]
struct ArticleRow<'a> {
    title: &'a str,
    authors: String,
    year: Option<i32>,
    doi: &'a str,
    url: &'a str,
}

impl<'a> From<&'a Article> for ArticleRow<'a> {
    fn from(a: &'a Article) -> Self {
        Self {
            title: a.title.as_deref().unwrap_or_default(),
            authors: a.authors.join("; "),
            year: a.year,
            doi: a.doi.as_deref().unwrap_or_default(),
            url: a.url.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct SpecialistRow<'a> {
    orcid: &'a str,
    name: &'a str,
    given_names: &'a str,
    family_names: &'a str,
    profile_url: &'a str,
}

impl<'a> From<&'a Specialist> for SpecialistRow<'a> {
    fn from(s: &'a Specialist) -> Self {
        Self {
            orcid: s.orcid.as_deref().unwrap_or_default(),
            name: s.full_name.as_deref().unwrap_or_default(),
            given_names: s.given_names.as_deref().unwrap_or_default(),
            family_names: s.family_names.as_deref().unwrap_or_default(),
            profile_url: s.profile_url.as_deref().unwrap_or_default(),
        }
    }
}

async fn run_search(
    query: String,
    page: u32,
    country: Option<String>,
    lang: Option<Language>,
    output: Option<PathBuf>,
    mailto: Option<String>,
) -> Result<()> {
    let language = lang.unwrap_or_else(|| preferences().load().language);
    let config = Config {
        openalex_mailto: mailto,
        ..Default::default()
    };
    let service = SearchService::new(&config)?;

    let mut session = SearchSession::new();
    let Some(ticket) = session.submit_at(&query, page) else {
        println!("{}", language.labels().invalid_message);
        return Ok(());
    };

    let result = service.search(&ticket.query, ticket.page, country.as_deref()).await;
    let response = result.as_ref().ok().cloned();
    session.apply(&ticket, result);
    println!("{}", session.view(language));

    if let (Some(dir), Some(response)) = (output, response) {
        let folder = dir.join(format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), safe_name(&query)));
        std::fs::create_dir_all(&folder).context("Failed to create output directory")?;
        println!("\nOutput folder: {}", folder.display());

        let articles: Vec<ArticleRow> = response.articles.iter().map(ArticleRow::from).collect();
        let specialists: Vec<SpecialistRow> = response.specialists.iter().map(SpecialistRow::from).collect();
        save_csv(&folder.join("articles.csv"), &articles)?;
        save_csv(&folder.join("specialists.csv"), &specialists)?;
    }

    Ok(())
}

fn safe_name(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// Save data to CSV file
fn save_csv<T: Serialize>(path: &Path, data: &[T]) -> Result<()> {
    if data.is_empty() {
        println!("No data to save to {:?}", path);
        return Ok(());
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context("Failed to create CSV writer")?;

    for item in data {
        wtr.serialize(item).context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    println!("Saved: {:?}", path);
    Ok(())
}

// ============================================================================
// Browse / Chat
// ============================================================================

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}

async fn fetch_and_show(client: &OlasisClient, session: &mut SearchSession, ticket: FetchTicket, lang: Language) {
    println!("{}", session.view(lang));
    let result = client.search(&ticket.query, ticket.page).await;
    if session.apply(&ticket, result) {
        println!("\n{}", session.view(lang));
    }
}

async fn run_browse(query: Option<String>, server: Option<String>, lang: Option<Language>) -> Result<()> {
    let (server, mut language) = resolve_client_settings(server, lang)?;
    let client = OlasisClient::new(&server)?;
    let mut session = SearchSession::new();
    info!(server = %server, "Browsing");

    println!("Commands: <query> | an/ap (articles next/prev) | sn/sp (specialists next/prev) | lang <code> | quit");

    if let Some(ticket) = query.as_deref().and_then(|q| session.submit(q)) {
        fetch_and_show(&client, &mut session, ticket, language).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("\n> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let ticket = match line {
            "" => continue,
            "quit" | "exit" => break,
            "an" => session.request_page(Category::Articles, Direction::Next),
            "ap" => session.request_page(Category::Articles, Direction::Prev),
            "sn" => session.request_page(Category::Specialists, Direction::Next),
            "sp" => session.request_page(Category::Specialists, Direction::Prev),
            other => match other.strip_prefix("lang ") {
                Some(code) => {
                    match code.parse::<Language>() {
                        Ok(l) => {
                            language = l;
                            if let Some(view) = session.relabel(language) {
                                println!("{}", view);
                            }
                        }
                        Err(e) => println!("{}", e),
                    }
                    continue;
                }
                None => session.submit(other),
            },
        };

        match ticket {
            Some(ticket) => fetch_and_show(&client, &mut session, ticket, language).await,
            None => println!("-"),
        }
    }

    Ok(())
}

async fn run_chat(server: Option<String>, lang: Option<Language>) -> Result<()> {
    let (server, language) = resolve_client_settings(server, lang)?;
    let mut session = ChatSession::new(OlasisClient::new(&server)?, language);
    info!(server = %server, session = session.session_id(), "Chatting with OLABOT");

    println!("OLABOT ({}) - /reset, /lang <code>, /quit", server);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("\nyou> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset();
                println!("(conversation cleared)");
            }
            other if other.starts_with("/lang ") => match other["/lang ".len()..].parse::<Language>() {
                Ok(l) => session.set_language(l),
                Err(e) => println!("{}", e),
            },
            message => {
                if let Some(reply) = session.send(message).await {
                    println!("\nolabot> {}", reply);
                }
            }
        }
    }

    Ok(())
}

fn handle_lang(code: Option<Language>) -> Result<()> {
    let store = preferences();
    match code {
        Some(language) => {
            store.set_language(language).context("Failed to save preferences")?;
            println!("Language set to {} ({:?})", language, store.path());
        }
        None => println!("{}", store.load().language),
    }
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(config: Config) -> Result<()> {
    config.validate()?;
    info!(host = %config.host, port = config.port, model = %config.model, "Starting HTTP server");

    let gateway = GeminiGateway::new(&config).context("Failed to initialize LLM gateway")?;
    let state = AppState {
        bot: Arc::new(OlaBot::new(Arc::new(gateway))),
        search: SearchService::new(&config)?,
        temperature: config.temperature,
    };

    let addr: SocketAddr = config.bind_addr().parse().context("Invalid host:port")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("Server error")?;

    Ok(())
}
