//! Display languages and their fixed label tables.
//!
//! The active language only changes user-facing text (labels, placeholders,
//! fallback and suggestion strings). Classification and prompt composition
//! ignore it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported UI languages. Spanish is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
    Pt,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Es, Language::En, Language::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::Es => &ES,
            Language::En => &EN,
            Language::Pt => &PT,
        }
    }

    /// Lenient parse for request parameters: unknown or missing codes fall
    /// back to the default language.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts bare codes and region-tagged ones (`pt-BR`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            _ => Err(format!("unsupported language: {}", s)),
        }
    }
}

/// User-facing strings for one language.
#[derive(Debug)]
pub struct Labels {
    pub untitled: &'static str,
    pub no_name: &'static str,
    pub no_articles: &'static str,
    pub no_specialists: &'static str,
    pub error_loading: &'static str,
    pub loading: &'static str,
    pub articles_heading: &'static str,
    pub specialists_heading: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    /// `{current}` and `{total}` are substituted by [`Labels::page_of`]
    pub page_of: &'static str,
    pub view_article: &'static str,
    pub view_profile: &'static str,
    pub invalid_message: &'static str,
    pub search_suggestion: &'static str,
    pub chat_apology: &'static str,
    pub chat_unreachable: &'static str,
}

impl Labels {
    pub fn page_of(&self, current: u32, total: u32) -> String {
        self.page_of
            .replace("{current}", &current.to_string())
            .replace("{total}", &total.to_string())
    }

    /// Fallback reply used whenever the LLM gateway fails.
    pub fn fallback_reply(&self) -> String {
        format!("{}\n\n{}", self.chat_apology, self.search_suggestion)
    }
}

static ES: Labels = Labels {
    untitled: "Sin título",
    no_name: "Sin nombre",
    no_articles: "No se encontraron artículos.",
    no_specialists: "No se encontraron especialistas.",
    error_loading: "Error al cargar los resultados. Inténtalo de nuevo.",
    loading: "Cargando...",
    articles_heading: "Artículos",
    specialists_heading: "Especialistas",
    previous: "Anterior",
    next: "Siguiente",
    page_of: "Página {current} de {total}",
    view_article: "Ver artículo",
    view_profile: "Ver perfil",
    invalid_message: "Por favor, envía un mensaje válido.",
    search_suggestion: "¿Quieres profundizar en este tema? Usa la búsqueda avanzada de OLASIS para encontrar artículos científicos y especialistas relacionados con tu consulta.",
    chat_apology: "Lo siento, en este momento OLABOT no puede generar una respuesta por limitaciones técnicas.",
    chat_unreachable: "No se pudo contactar con OLABOT. Revisa tu conexión e inténtalo de nuevo.",
};

static EN: Labels = Labels {
    untitled: "Untitled",
    no_name: "No name",
    no_articles: "No articles found.",
    no_specialists: "No specialists found.",
    error_loading: "Error loading results. Please try again.",
    loading: "Loading...",
    articles_heading: "Articles",
    specialists_heading: "Specialists",
    previous: "Previous",
    next: "Next",
    page_of: "Page {current} of {total}",
    view_article: "View article",
    view_profile: "View profile",
    invalid_message: "Please send a valid message.",
    search_suggestion: "Want to explore this topic further? Use the OLASIS advanced search to find scientific articles and specialists related to your question.",
    chat_apology: "Sorry, OLABOT cannot generate an answer right now due to technical limitations.",
    chat_unreachable: "Could not reach OLABOT. Check your connection and try again.",
};

static PT: Labels = Labels {
    untitled: "Sem título",
    no_name: "Sem nome",
    no_articles: "Nenhum artigo encontrado.",
    no_specialists: "Nenhum especialista encontrado.",
    error_loading: "Erro ao carregar os resultados. Tente novamente.",
    loading: "Carregando...",
    articles_heading: "Artigos",
    specialists_heading: "Especialistas",
    previous: "Anterior",
    next: "Próxima",
    page_of: "Página {current} de {total}",
    view_article: "Ver artigo",
    view_profile: "Ver perfil",
    invalid_message: "Por favor, envie uma mensagem válida.",
    search_suggestion: "Quer explorar mais sobre este tópico? Use a busca avançada do OLASIS para encontrar artigos científicos e especialistas relacionados à sua consulta.",
    chat_apology: "Desculpe, no momento o OLABOT não consegue gerar uma resposta por limitações técnicas.",
    chat_unreachable: "Não foi possível contatar o OLABOT. Verifique sua conexão e tente novamente.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_codes() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Es);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("pt-BR".parse::<Language>().unwrap(), Language::Pt);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_from_param_defaults_to_spanish() {
        assert_eq!(Language::from_param(None), Language::Es);
        assert_eq!(Language::from_param(Some("de")), Language::Es);
        assert_eq!(Language::from_param(Some("en")), Language::En);
    }

    #[test]
    fn test_page_of_substitution() {
        assert_eq!(Language::En.labels().page_of(2, 5), "Page 2 of 5");
        assert_eq!(Language::Es.labels().page_of(1, 3), "Página 1 de 3");
    }

    #[test]
    fn test_fallback_reply_contains_suggestion() {
        for lang in Language::ALL {
            let labels = lang.labels();
            let reply = labels.fallback_reply();
            assert!(reply.starts_with(labels.chat_apology));
            assert!(reply.ends_with(labels.search_suggestion));
        }
    }
}
