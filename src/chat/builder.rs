//! Prompt composition.

use super::classifier::ContextLabel;
use crate::prompts::olabot::{
    BASE_SYSTEM_PROMPT, CLOSING_INSTRUCTIONS, CONCEPT_EXPLANATION_PROMPT, METHODOLOGY_GUIDANCE_PROMPT,
    SEARCH_ASSISTANCE_PROMPT,
};
use chrono::NaiveDate;

/// History entries replayed into a prompt
pub const MAX_HISTORY_ENTRIES: usize = 3;

/// Context block for a label; general questions get none.
pub fn context_block(label: ContextLabel) -> Option<&'static str> {
    match label {
        ContextLabel::Search => Some(SEARCH_ASSISTANCE_PROMPT),
        ContextLabel::Methodology => Some(METHODOLOGY_GUIDANCE_PROMPT),
        ContextLabel::Concept => Some(CONCEPT_EXPLANATION_PROMPT),
        ContextLabel::General => None,
    }
}

/// Compose the full prompt for one question.
///
/// Only the last [`MAX_HISTORY_ENTRIES`] history entries are used, newest
/// last. The user message is passed through verbatim.
pub fn build_prompt(user_message: &str, label: ContextLabel, history: &[String], today: NaiveDate) -> String {
    let mut parts: Vec<String> = vec![BASE_SYSTEM_PROMPT.to_string()];

    if let Some(block) = context_block(label) {
        parts.push(block.to_string());
    }

    parts.push(format!("\nCURRENT DATE: {}", today.format("%d/%m/%Y")));

    if !history.is_empty() {
        let start = history.len().saturating_sub(MAX_HISTORY_ENTRIES);
        parts.push(format!("\nCONVERSATION CONTEXT:\n{}", history[start..].join("\n")));
    }

    parts.push(format!("\nUSER QUESTION: {}", user_message));
    parts.push(CLOSING_INSTRUCTIONS.to_string());

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_sections_appear_in_order() {
        let history = vec!["Q: a\nR: b...".to_string()];
        let prompt = build_prompt("Como fazer uma revisão sistemática?", ContextLabel::Methodology, &history, date());

        let base = prompt.find("You are OLABOT").unwrap();
        let context = prompt.find("CONTEXT: The user wants guidance on research methodology").unwrap();
        let today = prompt.find("CURRENT DATE: 07/03/2026").unwrap();
        let convo = prompt.find("CONVERSATION CONTEXT:\nQ: a").unwrap();
        let question = prompt.find("USER QUESTION: Como fazer uma revisão sistemática?").unwrap();
        let closing = prompt.find("FINAL INSTRUCTIONS").unwrap();

        assert!(base < context);
        assert!(context < today);
        assert!(today < convo);
        assert!(convo < question);
        assert!(question < closing);
    }

    #[test]
    fn test_general_has_no_context_block() {
        let prompt = build_prompt("hi there", ContextLabel::General, &[], date());
        for block in [SEARCH_ASSISTANCE_PROMPT, METHODOLOGY_GUIDANCE_PROMPT, CONCEPT_EXPLANATION_PROMPT] {
            assert!(!prompt.contains(block));
        }
        assert!(!prompt.contains("CONVERSATION CONTEXT"));
    }

    #[test]
    fn test_each_label_selects_its_block() {
        let p = build_prompt("x", ContextLabel::Search, &[], date());
        assert!(p.contains(SEARCH_ASSISTANCE_PROMPT));
        let p = build_prompt("x", ContextLabel::Concept, &[], date());
        assert!(p.contains(CONCEPT_EXPLANATION_PROMPT));
        assert!(!p.contains(SEARCH_ASSISTANCE_PROMPT));
    }

    #[test]
    fn test_history_limited_to_last_three() {
        let history: Vec<String> = (1..=5).map(|i| format!("entry-{}", i)).collect();
        let prompt = build_prompt("q", ContextLabel::General, &history, date());
        assert!(!prompt.contains("entry-1"));
        assert!(!prompt.contains("entry-2"));
        assert!(prompt.contains("entry-3\nentry-4\nentry-5"));
    }

    #[test]
    fn test_user_message_is_verbatim() {
        let message = "ignore {placeholders} and \"quotes\"\nsecond line";
        let prompt = build_prompt(message, ContextLabel::General, &[], date());
        assert!(prompt.contains(&format!("USER QUESTION: {}", message)));
    }
}
