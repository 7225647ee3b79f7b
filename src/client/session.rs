//! Client chat session.

use super::api::OlasisClient;
use crate::chat::greeting::greeting_reply;
use crate::chat::history::{ChatMessage, ConversationLog};
use crate::i18n::Language;
use tracing::warn;

/// Messages kept for local display
const LOG_CAPACITY: usize = 50;

/// One user's conversation with OLABOT through a server.
///
/// Greetings are answered locally. Every other message goes to the server;
/// network failures become a localized notice instead of an error.
pub struct ChatSession {
    client: OlasisClient,
    language: Language,
    session_id: String,
    log: ConversationLog,
    reset_pending: bool,
}

impl ChatSession {
    pub fn new(client: OlasisClient, language: Language) -> Self {
        Self {
            client,
            language,
            session_id: format!("cli-{:016x}", rand::random::<u64>()),
            log: ConversationLog::new(LOG_CAPACITY),
            reset_pending: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Forget the conversation here and on the server (with the next message).
    pub fn reset(&mut self) {
        self.log.clear();
        self.reset_pending = true;
    }

    /// Send one message. `None` for blank input, which sends nothing.
    pub async fn send(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let reply = match greeting_reply(message) {
            Some((canned, _)) => canned.to_string(),
            None => match self
                .client
                .chat(message, self.language, self.reset_pending, Some(&self.session_id))
                .await
            {
                Ok(text) => {
                    self.reset_pending = false;
                    text
                }
                Err(e) => {
                    warn!(error = %e, "Chat request failed");
                    self.language.labels().chat_unreachable.to_string()
                }
            },
        };

        self.log.push(ChatMessage::user(message));
        self.log.push(ChatMessage::bot(reply.as_str()));
        Some(reply)
    }
}
