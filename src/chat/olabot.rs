//! OLABOT orchestrator.

use super::builder::{build_prompt, MAX_HISTORY_ENTRIES};
use super::classifier::classify;
use super::gateway::LlmGateway;
use super::history::{ChatMessage, ConversationLog};
use super::sanitizer::{assess, sanitize, with_search_suggestion};
use crate::i18n::Language;
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Exchanges remembered per session
const MAX_EXCHANGES: usize = 5;

/// Sessions kept in memory before the least recently used is evicted
pub const MAX_SESSIONS: usize = 1000;

/// Sessions idle longer than this are dropped
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Session used when the client does not send one
pub const DEFAULT_SESSION: &str = "default";

/// Snapshot of the chat counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_queries: u64,
    pub successful_responses: u64,
    pub error_count: u64,
    pub uptime_minutes: f64,
    pub success_rate: f64,
}

struct AtomicStats {
    total_queries: AtomicU64,
    successful_responses: AtomicU64,
    error_count: AtomicU64,
    started: Instant,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            total_queries: AtomicU64::new(0),
            successful_responses: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    fn get(&self) -> SessionStats {
        let total = self.total_queries.load(Ordering::Relaxed);
        let ok = self.successful_responses.load(Ordering::Relaxed);
        SessionStats {
            total_queries: total,
            successful_responses: ok,
            error_count: self.error_count.load(Ordering::Relaxed),
            uptime_minutes: (self.started.elapsed().as_secs_f64() / 60.0 * 100.0).round() / 100.0,
            success_rate: ok as f64 / total.max(1) as f64 * 100.0,
        }
    }
}

/// Model and availability details for `/api/chat/info`
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub available: bool,
    pub session_stats: SessionStats,
}

struct SessionEntry {
    log: ConversationLog,
    last_used: Instant,
}

/// The research assistant: classifies, prompts, calls the gateway and
/// cleans up the answer. Conversation logs are kept per session id, up to
/// `max_sessions` of them; idle sessions expire.
pub struct OlaBot {
    gateway: Arc<dyn LlmGateway>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
    idle_timeout: Duration,
    stats: AtomicStats,
}

impl OlaBot {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            sessions: Mutex::new(HashMap::new()),
            max_sessions: MAX_SESSIONS,
            idle_timeout: SESSION_IDLE,
            stats: AtomicStats::new(),
        }
    }

    /// Override the session cap and idle timeout
    pub fn with_session_limits(mut self, max_sessions: usize, idle_timeout: Duration) -> Self {
        self.max_sessions = max_sessions.max(1);
        self.idle_timeout = idle_timeout;
        self
    }

    /// Number of sessions currently holding a conversation log
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or_default()
    }

    /// Answer one message. Never fails: gateway errors and empty replies
    /// become the localized fallback text.
    ///
    /// `message` must already be trimmed and non-empty. `reset` clears the
    /// session's history before answering.
    pub async fn ask(&self, message: &str, lang: Language, session: &str, reset: bool) -> String {
        self.stats.total_queries.fetch_add(1, Ordering::Relaxed);

        if reset {
            self.clear_history(session);
        }

        let label = classify(message);
        let history = self.recent_history(session);
        let prompt = build_prompt(message, label, &history, Local::now().date_naive());

        debug!(session = session, label = %label, history = history.len(), "Built OLABOT prompt");

        let reply = match self.gateway.generate(&prompt).await {
            Ok(raw) => {
                let cleaned = sanitize(&raw);
                if assess(&cleaned).has_content {
                    self.stats.successful_responses.fetch_add(1, Ordering::Relaxed);
                    with_search_suggestion(&cleaned, lang)
                } else {
                    warn!(session = session, chars = cleaned.chars().count(), "LLM reply too short, using fallback");
                    self.stats.error_count.fetch_add(1, Ordering::Relaxed);
                    return lang.labels().fallback_reply();
                }
            }
            Err(e) => {
                warn!(session = session, error = %e, "LLM gateway failed, using fallback");
                self.stats.error_count.fetch_add(1, Ordering::Relaxed);
                return lang.labels().fallback_reply();
            }
        };

        self.record(session, message, &reply);
        info!(session = session, label = %label, reply_chars = reply.chars().count(), "OLABOT answered");
        reply
    }

    pub fn clear_history(&self, session: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(session);
            debug!(session = session, "Conversation history cleared");
        }
    }

    /// Messages currently remembered for a session
    pub fn history(&self, session: &str) -> Vec<ChatMessage> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(session).map(|entry| entry.log.messages().cloned().collect()))
            .unwrap_or_default()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.get()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model: self.gateway.model().to_string(),
            available: self.gateway.is_available(),
            session_stats: self.stats(),
        }
    }

    fn recent_history(&self, session: &str) -> Vec<String> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| {
                sessions
                    .get(session)
                    .filter(|entry| entry.last_used.elapsed() <= self.idle_timeout)
                    .map(|entry| entry.log.recent_exchanges(MAX_HISTORY_ENTRIES))
            })
            .unwrap_or_default()
    }

    fn record(&self, session: &str, question: &str, reply: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            let now = Instant::now();
            let idle = self.idle_timeout;
            sessions.retain(|_, entry| now.duration_since(entry.last_used) <= idle);

            if !sessions.contains_key(session) {
                while sessions.len() >= self.max_sessions {
                    let oldest = sessions
                        .iter()
                        .min_by_key(|(_, entry)| entry.last_used)
                        .map(|(id, _)| id.clone());
                    match oldest {
                        Some(id) => {
                            sessions.remove(&id);
                            debug!(session = %id, "Evicted least recently used session");
                        }
                        None => break,
                    }
                }
            }

            let entry = sessions.entry(session.to_string()).or_insert_with(|| SessionEntry {
                log: ConversationLog::new(MAX_EXCHANGES * 2),
                last_used: now,
            });
            entry.last_used = now;
            entry.log.push(ChatMessage::user(question));
            entry.log.push(ChatMessage::bot(reply));
        }
    }
}
