//! Starter questions shown next to the chat box.
//!
//! Suggestions are picked from fixed tables and shuffled on every call.

use rand::seq::SliceRandom;
use rand::Rng;

/// Contexts the client can ask for
pub const CONTEXTS: &[(&str, &[&str])] = &[
    (
        "beginner",
        &[
            "O que é uma revisão sistemática?",
            "Como começar uma pesquisa científica?",
            "Quais são as principais bases de dados acadêmicas?",
            "Como avaliar a qualidade de um artigo científico?",
        ],
    ),
    (
        "intermediate",
        &[
            "Como fazer uma análise bibliométrica?",
            "Qual metodologia usar para pesquisa qualitativa?",
            "Como encontrar gaps na literatura científica?",
            "Quais critérios usar para revisão por pares?",
        ],
    ),
    (
        "advanced",
        &[
            "Como conduzir uma meta-análise?",
            "Estratégias para publicar em periódicos de alto impacto",
            "Como estruturar uma proposta de financiamento?",
            "Tendências emergentes em inteligência artificial",
        ],
    ),
    (
        "search_focused",
        &[
            "Como encontrar artigos sobre sustentabilidade?",
            "Buscar especialistas em biotecnologia",
            "Onde encontrar dados sobre mudanças climáticas?",
            "Como acessar teses e dissertações?",
        ],
    ),
    (
        "methodology_focused",
        &[
            "Diferenças entre pesquisa quantitativa e qualitativa",
            "Como calcular o tamanho da amostra?",
            "Métodos de análise de dados textuais",
            "Como validar instrumentos de pesquisa?",
        ],
    ),
    (
        "general",
        &[
            "O que é inteligência artificial?",
            "Como citar artigos científicos corretamente?",
            "Quais são as tendências em pesquisa médica?",
            "Como colaborar com pesquisadores internacionais?",
        ],
    ),
];

/// Knowledge fields with their own question sets
pub const FIELDS: &[(&str, &[&str])] = &[
    (
        "medicina",
        &[
            "Avanços recentes em medicina personalizada",
            "Como conduzir ensaios clínicos randomizados?",
            "Pesquisas sobre COVID-19 e suas sequelas",
            "Inovações em telemedicina",
        ],
    ),
    (
        "tecnologia",
        &[
            "Aplicações de machine learning na ciência",
            "Blockchain na pesquisa científica",
            "Internet das Coisas (IoT) em saúde",
            "Computação quântica: fundamentos e aplicações",
        ],
    ),
    (
        "meio_ambiente",
        &[
            "Pesquisas sobre energias renováveis",
            "Impactos das mudanças climáticas",
            "Biodiversidade e conservação",
            "Economia circular e sustentabilidade",
        ],
    ),
    (
        "educacao",
        &[
            "Metodologias ativas de aprendizagem",
            "Tecnologia educacional pós-pandemia",
            "Avaliação da aprendizagem online",
            "Inclusão digital na educação",
        ],
    ),
];

/// Default for `general` if its context entry is missing
const FALLBACK: &[&str] = &[
    "O que é inteligência artificial?",
    "Como fazer uma pesquisa científica?",
    "Onde encontrar artigos acadêmicos?",
    "Como avaliar fontes científicas?",
];

const ADVANCED_TERMS: &[&str] = &["meta-análise", "metodologia", "estatística", "análise", "correlação"];
const BEGINNER_TERMS: &[&str] = &["o que é", "como", "definição", "básico", "introdução"];

const FIELD_KEYWORDS: &[(&str, &[&str])] = &[
    ("medicina", &["médico", "saúde", "clínico", "paciente", "doença"]),
    ("tecnologia", &["tecnologia", "algoritmo", "software", "dados", "inteligência"]),
    ("meio_ambiente", &["ambiente", "clima", "sustentável", "ecologia", "verde"]),
    ("educacao", &["educação", "ensino", "aprendizagem", "escola", "pedagógico"]),
];

fn lookup(table: &'static [(&'static str, &'static [&'static str])], key: &str) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn general() -> &'static [&'static str] {
    lookup(CONTEXTS, "general").unwrap_or(FALLBACK)
}

fn push_unique(out: &mut Vec<String>, item: &str) {
    if !out.iter().any(|s| s == item) {
        out.push(item.to_string());
    }
}

/// Suggestions for a context name; unknown names use `general`.
/// `general` and `advanced` also mix in two random field questions.
pub fn contextual<R: Rng + ?Sized>(context: &str, limit: usize, rng: &mut R) -> Vec<String> {
    let base = lookup(CONTEXTS, context).unwrap_or_else(general);
    let mut out: Vec<String> = Vec::new();
    for s in base {
        push_unique(&mut out, s);
    }

    if matches!(context, "general" | "advanced") {
        let extra: Vec<&str> = FIELDS
            .iter()
            .flat_map(|(_, items)| items.iter().copied())
            .filter(|s| !out.iter().any(|o| o == s))
            .collect();
        for s in extra.choose_multiple(rng, 2) {
            push_unique(&mut out, s);
        }
    }

    out.shuffle(rng);
    out.truncate(limit);
    out
}

/// Suggestions for a knowledge field; unknown fields use `general`.
pub fn by_field<R: Rng + ?Sized>(field: &str, limit: usize, rng: &mut R) -> Vec<String> {
    let mut out: Vec<String> = lookup(FIELDS, field)
        .unwrap_or_else(general)
        .iter()
        .map(|s| s.to_string())
        .collect();
    out.shuffle(rng);
    out.truncate(limit);
    out
}

/// Level a question history suggests
fn level_for(history_text: &str) -> &'static str {
    if ADVANCED_TERMS.iter().any(|t| history_text.contains(t)) {
        "advanced"
    } else if BEGINNER_TERMS.iter().any(|t| history_text.contains(t)) {
        "beginner"
    } else {
        "intermediate"
    }
}

fn field_for(history_text: &str) -> Option<&'static str> {
    FIELD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| history_text.contains(k)))
        .map(|(field, _)| *field)
}

/// Suggestions adapted to the user's earlier questions: half from the
/// detected level, the rest from the detected field (or `general`).
pub fn adaptive<R: Rng + ?Sized>(history: &[String], limit: usize, rng: &mut R) -> Vec<String> {
    if history.is_empty() {
        return contextual("general", limit, rng);
    }

    let text = history.join(" ").to_lowercase();
    let mut out = contextual(level_for(&text), limit / 2, rng);
    let remaining = limit - out.len();

    let rest = match field_for(&text) {
        Some(field) => by_field(field, remaining, rng),
        None => contextual("general", remaining, rng),
    };
    for s in &rest {
        push_unique(&mut out, s);
    }

    out.truncate(limit);
    out
}
