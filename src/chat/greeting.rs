//! Exact-match greeting shortcut.
//!
//! A handful of greetings are answered from a fixed table so the LLM is
//! never called for them. Matching is exact after normalization; "hola
//! amigo" is not a greeting.

use crate::i18n::Language;

const GREETINGS: &[(&str, Language)] = &[
    ("hola", Language::Es),
    ("buenas", Language::Es),
    ("buenos dias", Language::Es),
    ("buenas tardes", Language::Es),
    ("buenas noches", Language::Es),
    ("ola", Language::Pt),
    ("oi", Language::Pt),
    ("bom dia", Language::Pt),
    ("boa tarde", Language::Pt),
    ("boa noite", Language::Pt),
    ("hello", Language::En),
    ("hi", Language::En),
    ("hey", Language::En),
    ("good morning", Language::En),
    ("good afternoon", Language::En),
    ("good evening", Language::En),
];

fn canned_reply(lang: Language) -> &'static str {
    match lang {
        Language::Es => "¡Hola! Soy OLABOT, tu asistente de investigación científica en OLASIS. Puedo ayudarte a encontrar artículos, especialistas y a entender conceptos o metodologías. ¿Sobre qué tema quieres investigar hoy?",
        Language::Pt => "Olá! Sou o OLABOT, seu assistente de pesquisa científica no OLASIS. Posso ajudar a encontrar artigos, especialistas e a entender conceitos ou metodologias. Sobre qual tema você quer pesquisar hoje?",
        Language::En => "Hello! I'm OLABOT, your scientific research assistant in OLASIS. I can help you find articles and specialists, and explain concepts or methodologies. What topic would you like to research today?",
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Lower-case, fold accents, strip surrounding punctuation and collapse
/// inner whitespace.
pub fn normalize(message: &str) -> String {
    let folded: String = message.to_lowercase().chars().map(fold_diacritic).collect();
    folded
        .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '¡' | '¿'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canned reply and its language when `message` is a known greeting.
pub fn greeting_reply(message: &str) -> Option<(&'static str, Language)> {
    let normalized = normalize(message);
    GREETINGS
        .iter()
        .find(|(token, _)| *token == normalized)
        .map(|(_, lang)| (canned_reply(*lang), *lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("¡Hola!"), "hola");
        assert_eq!(normalize("  Olá!!  "), "ola");
        assert_eq!(normalize("Buenos   Días..."), "buenos dias");
        assert_eq!(normalize("¿Qué?"), "que");
    }

    #[test]
    fn test_spanish_greeting() {
        let (reply, lang) = greeting_reply("¡Hola!").unwrap();
        assert_eq!(lang, Language::Es);
        assert!(reply.starts_with("¡Hola! Soy OLABOT"));
    }

    #[test]
    fn test_portuguese_and_english_greetings() {
        assert_eq!(greeting_reply("Olá").unwrap().1, Language::Pt);
        assert_eq!(greeting_reply("oi?").unwrap().1, Language::Pt);
        assert_eq!(greeting_reply("Hello!").unwrap().1, Language::En);
        assert_eq!(greeting_reply("Good morning.").unwrap().1, Language::En);
    }

    #[test]
    fn test_no_partial_matches() {
        assert!(greeting_reply("hola, ¿qué es la entropía?").is_none());
        assert!(greeting_reply("history").is_none());
        assert!(greeting_reply("").is_none());
    }
}
