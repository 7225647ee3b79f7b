//! Keyword-based context classification.
//!
//! The label only selects which prompt template is added; it carries no
//! confidence and is recomputed for every message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of help a chat message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextLabel {
    Search,
    Methodology,
    Concept,
    General,
}

impl ContextLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextLabel::Search => "search",
            ContextLabel::Methodology => "methodology",
            ContextLabel::Concept => "concept",
            ContextLabel::General => "general",
        }
    }
}

impl fmt::Display for ContextLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SEARCH_KEYWORDS: &[&str] = &[
    // pt
    "buscar", "procurar", "encontrar", "pesquisar", "artigos", "estudos", "publicações",
    "literatura", "bibliografia", "referências",
    // es
    "artículos", "estudios", "publicaciones", "bibliografía", "referencias",
    // en
    "find", "look for", "search for", "articles", "papers", "publications", "literature",
    "references",
];

const METHODOLOGY_KEYWORDS: &[&str] = &[
    // pt
    "metodologia", "método", "como fazer", "como pesquisar", "abordagem", "procedimento",
    "técnica", "protocolo", "análise", "coleta de dados",
    // es
    "metodología", "cómo hacer", "como hacer", "enfoque", "procedimiento", "análisis",
    "recolección de datos",
    // en
    "methodology", "method", "how to", "approach", "procedure", "technique", "protocol",
    "analysis", "data collection",
];

const CONCEPT_KEYWORDS: &[&str] = &[
    // pt
    "o que é", "o que significa", "definição", "conceito", "explique", "significado",
    "definir", "entender",
    // es
    "qué es", "qué significa", "definición", "concepto", "explica", "entender",
    // en
    "what is", "what does", "meaning", "definition", "concept", "explain", "define",
    "understand",
];

/// Keyword sets in priority order; the first set with a hit wins.
const KEYWORD_TABLE: &[(ContextLabel, &[&str])] = &[
    (ContextLabel::Search, SEARCH_KEYWORDS),
    (ContextLabel::Methodology, METHODOLOGY_KEYWORDS),
    (ContextLabel::Concept, CONCEPT_KEYWORDS),
];

/// Classify a non-empty user message.
pub fn classify(message: &str) -> ContextLabel {
    let lower = message.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(label, _)| *label)
        .unwrap_or(ContextLabel::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_messages() {
        for msg in [
            "Onde encontrar artigos sobre diabetes?",
            "Como procurar estudos de sustentabilidade?",
            "Preciso buscar literatura sobre AI",
            "¿Dónde hay artículos sobre volcanes?",
            "Can you find papers on protein folding?",
        ] {
            assert_eq!(classify(msg), ContextLabel::Search, "{}", msg);
        }
    }

    #[test]
    fn test_search_keyword_at_end_of_message() {
        assert_eq!(classify("Which one can I find"), ContextLabel::Search);
        assert_eq!(classify("Where do I find?"), ContextLabel::Search);
    }

    #[test]
    fn test_methodology_messages() {
        for msg in [
            "Como fazer análise qualitativa?",
            "Qual procedimento usar para coleta de dados?",
            "Que metodologia é melhor para meu estudo?",
            "How to design a survey?",
        ] {
            assert_eq!(classify(msg), ContextLabel::Methodology, "{}", msg);
        }
    }

    #[test]
    fn test_concept_messages() {
        for msg in [
            "O que significa revisão sistemática?",
            "Explique o conceito de big data",
            "¿Qué es la entropía?",
            "What is machine learning?",
        ] {
            assert_eq!(classify(msg), ContextLabel::Concept, "{}", msg);
        }
    }

    #[test]
    fn test_general_fallback() {
        for msg in ["Estou começando minha pesquisa", "Gracias!", "Tell me a joke"] {
            assert_eq!(classify(msg), ContextLabel::General, "{}", msg);
        }
    }

    #[test]
    fn test_search_has_priority_over_other_sets() {
        // contains both a search and a concept keyword
        assert_eq!(
            classify("What is the best way to find articles?"),
            ContextLabel::Search
        );
        // "como pesquisar" is methodology, "pesquisar" is search
        assert_eq!(classify("Como pesquisar bem?"), ContextLabel::Search);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("METODOLOGIA"), ContextLabel::Methodology);
        assert_eq!(classify("WHAT IS DNA"), ContextLabel::Concept);
    }

    #[test]
    fn test_label_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ContextLabel::Methodology).unwrap(), "\"methodology\"");
        assert_eq!(ContextLabel::General.to_string(), "general");
    }
}
