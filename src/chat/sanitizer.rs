//! Markdown-to-plain-text post-processing for LLM replies.
//!
//! The rules are applied in order, and the whole pass is repeated until the
//! text stops changing. Every rewrite either shortens the text or removes a
//! list-marker character without growing it, so the loop terminates and the
//! result is a fixed point: `sanitize(sanitize(x)) == sanitize(x)`.

use crate::i18n::Language;
use regex::Regex;
use std::sync::OnceLock;

/// `(pattern, replacement)` pairs in application order
const RULES: &[(&str, &str)] = &[
    // line endings and trailing blanks
    (r"\r\n?", "\n"),
    (r"(?m)[ \t]+$", ""),
    // headings
    (r"(?m)^[ \t]*#{1,6}[ \t]*", ""),
    // bullet and numbered list markers
    (r"(?m)^[ \t]*[-*+][ \t]+", "• "),
    (r"(?m)^[ \t]*\d{1,3}[.)][ \t]+", ""),
    // links and images keep their label
    (r"!?\[([^\[\]\n]*)\]\([^()\s]*\)", "${1}"),
    // emphasis
    (r"\*\*([^\n]+?)\*\*", "${1}"),
    (r"__([^\n]+?)__", "${1}"),
    (r"\*([^*\s](?:[^*\n]*[^*\s])?)\*", "${1}"),
    (r"(^|\W)_([^_\s](?:[^_\n]*[^_\s])?)_(\W|$)", "${1}${2}${3}"),
    // unmatched bold markers; underscore runs only at a word edge
    (r"\*{2,}", ""),
    (r"(^|\W)_{2,}", "${1}"),
    (r"_{2,}(\W|$)", "${1}"),
    // blank-line runs
    (r"\n{3,}", "\n\n"),
];

/// Words that show a reply already points at the search feature
const SEARCH_MENTIONS: &[&str] = &["olasis", "busca", "búsqueda", "search"];

fn rules() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, *replacement)))
            .collect()
    })
}

fn single_pass(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in rules() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out.trim().to_string()
}

/// Strip markdown syntax and normalize whitespace.
pub fn sanitize(raw: &str) -> String {
    let mut current = single_pass(raw);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Append the localized "use search" suggestion unless the text already
/// mentions OLASIS or its search feature.
pub fn with_search_suggestion(text: &str, lang: Language) -> String {
    let lower = text.to_lowercase();
    if SEARCH_MENTIONS.iter().any(|m| lower.contains(m)) {
        return text.to_string();
    }
    format!("{}\n\n{}", text, lang.labels().search_suggestion)
}

/// Heuristic quality flags for a sanitized reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseQuality {
    pub has_content: bool,
    pub no_markdown: bool,
    pub proper_length: bool,
}

/// Replies with at most this many characters count as empty
const MIN_CONTENT_CHARS: usize = 50;

pub fn assess(text: &str) -> ResponseQuality {
    let len = text.trim().chars().count();
    ResponseQuality {
        has_content: len > MIN_CONTENT_CHARS,
        no_markdown: !["**", "__", "##", "]("].iter().any(|m| text.contains(m)),
        proper_length: (100..=2000).contains(&len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(rules().len(), RULES.len());
    }

    #[test]
    fn test_removes_emphasis() {
        let out = sanitize("**bold** and *italic*");
        assert_eq!(out, "bold and italic");
        assert!(!out.contains('*'));

        assert_eq!(sanitize("__strong__ and _soft_ text"), "strong and soft text");
        assert_eq!(sanitize("***both***"), "both");
    }

    #[test]
    fn test_removes_stray_underscore_runs() {
        assert_eq!(sanitize("__x__y__"), "xy");
        assert_eq!(sanitize("dangling__ marker"), "dangling marker");
        assert_eq!(sanitize("keep snake_case and a__b"), "keep snake_case and a__b");
    }

    #[test]
    fn test_keeps_snake_case_and_arithmetic() {
        assert_eq!(sanitize("use snake_case_names"), "use snake_case_names");
        assert_eq!(sanitize("2 * 3 * 4 = 24"), "2 * 3 * 4 = 24");
    }

    #[test]
    fn test_strips_headings() {
        assert_eq!(sanitize("# Title\n## Sub\n### Deep\ntext"), "Title\nSub\nDeep\ntext");
    }

    #[test]
    fn test_collapses_links() {
        assert_eq!(
            sanitize("See [OpenAlex](https://openalex.org) and ![logo](x.png)."),
            "See OpenAlex and logo."
        );
        assert_eq!(sanitize("[[a](b)](c)"), "a");
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(sanitize("- one\n* two\n+ three"), "• one\n• two\n• three");
        assert_eq!(sanitize("1. first\n2) second\n  10. tenth"), "first\nsecond\ntenth");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(sanitize("a\n\n\n\nb\r\n\r\n\r\nc"), "a\n\nb\n\nc");
        assert_eq!(sanitize("a\n  \n \t\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_idempotent_on_tricky_inputs() {
        for input in [
            "**a** *b* __c__ _d_",
            "*a*b*",
            "- **item** with [link](u)\n\n\n\n1. step",
            "****",
            "# # nested heading",
            "_x_y_",
            "* * *",
            "",
        ] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_search_suggestion_appended_once() {
        let text = "Photosynthesis converts light into chemical energy.";
        let out = with_search_suggestion(text, Language::En);
        assert!(out.starts_with(text));
        assert!(out.ends_with(Language::En.labels().search_suggestion));

        // the suggestion mentions OLASIS, so a second call is a no-op
        assert_eq!(with_search_suggestion(&out, Language::En), out);
    }

    #[test]
    fn test_search_suggestion_skipped_when_mentioned() {
        let text = "Use a busca avançada para mais artigos.";
        assert_eq!(with_search_suggestion(text, Language::Pt), text);
        let text = "Try the OLASIS tools.";
        assert_eq!(with_search_suggestion(text, Language::Es), text);
    }

    #[test]
    fn test_assess() {
        let q = assess("too short");
        assert!(!q.has_content);
        assert!(!q.proper_length);

        let long = "a".repeat(150);
        let q = assess(&long);
        assert!(q.has_content && q.no_markdown && q.proper_length);
        assert!(!assess("**x**").no_markdown);
    }
}
