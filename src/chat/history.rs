//! Bounded conversation log.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Characters of a bot reply kept when it is replayed as prompt context
const REPLY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One chat turn. Messages are immutable once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub role: Role,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::Bot,
        }
    }
}

/// Ordered log that keeps only the most recent `capacity` messages.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ConversationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// The last `n` question/answer pairs formatted for the prompt, oldest first.
    ///
    /// Answers are cut to a short preview. A trailing question without an
    /// answer is ignored.
    pub fn recent_exchanges(&self, n: usize) -> Vec<String> {
        let mut exchanges = Vec::new();
        let mut pending_question: Option<&str> = None;

        for message in &self.messages {
            match message.role {
                Role::User => pending_question = Some(message.text.as_str()),
                Role::Bot => {
                    if let Some(question) = pending_question.take() {
                        let preview: String = message.text.chars().take(REPLY_PREVIEW_CHARS).collect();
                        exchanges.push(format!("Q: {}\nR: {}...", question, preview));
                    }
                }
            }
        }

        let skip = exchanges.len().saturating_sub(n);
        exchanges.split_off(skip)
    }
}
