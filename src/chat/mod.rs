//! OLABOT chat pipeline.
//!
//! greeting shortcut → context classifier → prompt builder → LLM gateway
//! → response sanitizer. [`OlaBot`] wires the stages together and keeps the
//! per-session conversation logs.

pub mod builder;
pub mod classifier;
pub mod gateway;
pub mod greeting;
pub mod history;
pub mod olabot;
pub mod sanitizer;
pub mod suggestions;

pub use builder::build_prompt;
pub use classifier::{classify, ContextLabel};
pub use gateway::{GatewayError, GeminiGateway, LlmGateway};
pub use greeting::greeting_reply;
pub use history::{ChatMessage, ConversationLog, Role};
pub use olabot::{OlaBot, SessionStats};
pub use sanitizer::{sanitize, with_search_suggestion};
