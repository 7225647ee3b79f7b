//! Prompt module for LLM-based operations.
//!
//! This module holds the fixed OLABOT prompt templates.

pub mod olabot;

pub use olabot::*;
