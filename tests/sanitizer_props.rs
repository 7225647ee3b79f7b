//! Property tests for the response sanitizer.

use olasis::chat::sanitize;
use proptest::prelude::*;

/// Text built from markdown-ish fragments, which hits the rules far more
/// often than arbitrary strings.
fn markdownish() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("**".to_string()),
        Just("*".to_string()),
        Just("__".to_string()),
        Just("_".to_string()),
        Just("# ".to_string()),
        Just("## ".to_string()),
        Just("- ".to_string()),
        Just("1. ".to_string()),
        Just("[".to_string()),
        Just("](".to_string()),
        Just(")".to_string()),
        Just("\n".to_string()),
        Just("\r\n".to_string()),
        Just("  ".to_string()),
        "[a-zA-Záéíõç]{1,8}",
    ];
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(input in markdownish()) {
        let once = sanitize(&input);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_is_idempotent_on_arbitrary_text(input in ".{0,200}") {
        let once = sanitize(&input);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitized_text_has_no_long_blank_runs(input in markdownish()) {
        let out = sanitize(&input);
        prop_assert!(!out.contains("\n\n\n"));
        prop_assert!(!out.contains("**"));
        prop_assert!(!out.contains('\r'));
    }
}
