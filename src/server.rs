//! HTTP API.
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /api/search?q=&page=&country=`
//! - `POST /api/chat`
//! - `GET  /api/chat/suggestions`
//! - `GET  /api/chat/info`
//! - `GET  /api/stats`

use crate::chat::olabot::{ModelInfo, OlaBot, DEFAULT_SESSION};
use crate::chat::suggestions;
use crate::error::OlasisError;
use crate::i18n::Language;
use crate::search::{CorpusStats, SearchResponse, SearchService};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Largest suggestion count a client may ask for
pub const MAX_SUGGESTIONS: usize = 10;
const DEFAULT_SUGGESTIONS: usize = 4;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<OlaBot>,
    pub search: SearchService,
    pub temperature: f32,
}

/// Error body: `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<OlasisError> for ApiError {
    fn from(err: OlasisError) -> Self {
        match err {
            OlasisError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Build the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/suggestions", get(suggestions_handler))
        .route("/api/chat/info", get(chat_info_handler))
        .route("/api/stats", get(stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

// === Search ===

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<String>,
    country: Option<String>,
}

/// Missing or blank page means 1; values below 1 clamp to 1.
fn parse_page(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(1),
        Some(s) => s
            .parse::<i64>()
            .map(|p| p.clamp(1, u32::MAX as i64) as u32)
            .map_err(|_| ApiError::BadRequest("Invalid page parameter.".to_string())),
    }
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest("No search query provided.".to_string()));
    }
    let page = parse_page(params.page.as_deref())?;
    let country = params.country.as_deref().map(str::trim).filter(|c| !c.is_empty());

    info!(query = %query, page = page, country = ?country, "Search request");
    let response = state.search.search(&query, page, country).await?;
    Ok(Json(response))
}

// === Chat ===

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub lang: Option<String>,
    pub reset: bool,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub lang: Language,
}

fn invalid_chat(lang: Language) -> Response {
    let body = ChatReply {
        response: lang.labels().invalid_message.to_string(),
        lang,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Malformed bodies get the same localized 400 as an empty message.
async fn chat_handler(State(state): State<AppState>, payload: Result<Json<Value>, JsonRejection>) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            info!(error = %rejection, "Rejected chat body");
            return invalid_chat(Language::default());
        }
    };
    let lang = Language::from_param(body.get("lang").and_then(Value::as_str));

    let req: ChatRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(e) => {
            info!(error = %e, "Rejected chat body");
            return invalid_chat(lang);
        }
    };
    let message = req.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return invalid_chat(lang);
    }

    let session = req
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION);

    let response = state.bot.ask(message, lang, session, req.reset).await;
    Json(ChatReply { response, lang }).into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsReply {
    pub suggestions: Vec<String>,
    pub context: String,
    pub field: Option<String>,
    pub count: usize,
}

/// `count` wins over `limit`. Non-integers and values above
/// [`MAX_SUGGESTIONS`] are rejected; anything below 1 becomes 1.
fn parse_limit(params: &[(String, String)]) -> Result<usize, ApiError> {
    let raw = first(params, "count").or_else(|| first(params, "limit"));
    let limit = match raw {
        None => DEFAULT_SUGGESTIONS as i64,
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest("Invalid limit provided.".to_string()))?,
    }
    .max(1);

    if limit > MAX_SUGGESTIONS as i64 {
        return Err(ApiError::BadRequest(format!(
            "Maximum allowed suggestions is {}.",
            MAX_SUGGESTIONS
        )));
    }
    Ok(limit as usize)
}

fn first<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

async fn suggestions_handler(
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SuggestionsReply>, ApiError> {
    let limit = parse_limit(&params)?;
    let context = first(&params, "context").unwrap_or("general").to_string();
    let field = first(&params, "field").filter(|f| !f.is_empty()).map(str::to_string);
    let history: Vec<String> = params
        .iter()
        .filter(|(k, v)| k == "history" && !v.trim().is_empty())
        .map(|(_, v)| v.clone())
        .collect();

    let mut rng = rand::thread_rng();
    let suggestions = if let Some(field) = &field {
        suggestions::by_field(field, limit, &mut rng)
    } else if !history.is_empty() {
        suggestions::adaptive(&history, limit, &mut rng)
    } else {
        suggestions::contextual(&context, limit, &mut rng)
    };

    Ok(Json(SuggestionsReply {
        count: suggestions.len(),
        suggestions,
        context,
        field,
    }))
}

#[derive(Debug, Serialize)]
struct ChatInfo {
    #[serde(flatten)]
    model: ModelInfo,
    temperature: f32,
}

async fn chat_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(ChatInfo {
        model: state.bot.model_info(),
        temperature: state.temperature,
    })
}

async fn stats_handler(State(state): State<AppState>) -> Json<CorpusStats> {
    let stats = state.search.stats().await;
    if let Some(e) = &stats.error {
        error!(error = %e, "Corpus stats degraded");
    }
    Json(stats)
}
