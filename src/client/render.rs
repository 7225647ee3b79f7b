//! View models for search results.
//!
//! Everything a result page shows is computed here from API data and the
//! active language, so the terminal front-end (and tests) only format
//! these structs.

use crate::i18n::Labels;
use crate::openalex::Article;
use crate::orcid::Specialist;
use crate::search::PageInfo;
use std::fmt;
use url::Url;

const DOI_RESOLVER: &str = "https://doi.org/";

/// Canonical resolver link for a DOI, with or without a resolver prefix.
pub fn doi_url(doi: &str) -> Option<String> {
    let trimmed = doi.trim();
    let lower = trimmed.to_ascii_lowercase();
    let bare = ["https://doi.org/", "http://doi.org/"]
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map_or(trimmed, |prefix| &trimmed[prefix.len()..]);

    (!bare.is_empty()).then(|| format!("{}{}", DOI_RESOLVER, bare))
}

/// Only absolute `https` URLs are rendered as links.
pub fn safe_link(raw: &str) -> Option<String> {
    Url::parse(raw.trim())
        .ok()
        .filter(|u| u.scheme() == "https")
        .map(String::from)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub title: String,
    /// `None` when the record lists no authors
    pub authors: Option<String>,
    pub year: Option<i32>,
    pub doi_link: Option<String>,
    pub link: Option<String>,
    pub link_label: &'static str,
}

impl ArticleCard {
    pub fn new(article: &Article, labels: &Labels) -> Self {
        let title = article
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(labels.untitled)
            .to_string();

        Self {
            title,
            authors: (!article.authors.is_empty()).then(|| article.authors.join(", ")),
            year: article.year,
            doi_link: article.doi.as_deref().and_then(doi_url),
            link: article.url.as_deref().and_then(safe_link),
            link_label: labels.view_article,
        }
    }
}

impl fmt::Display for ArticleCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {}", self.title)?;
        if let Some(year) = self.year {
            write!(f, " ({})", year)?;
        }
        if let Some(authors) = &self.authors {
            write!(f, "\n  {}", authors)?;
        }
        if let Some(doi) = &self.doi_link {
            write!(f, "\n  DOI: {}", doi)?;
        }
        if let Some(link) = &self.link {
            write!(f, "\n  {}: {}", self.link_label, link)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialistCard {
    pub name: String,
    pub orcid: Option<String>,
    pub profile_link: Option<String>,
    pub link_label: &'static str,
}

impl SpecialistCard {
    pub fn new(specialist: &Specialist, labels: &Labels) -> Self {
        let joined = [specialist.given_names.as_deref(), specialist.family_names.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let name = specialist
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| (!joined.is_empty()).then_some(joined))
            .unwrap_or_else(|| labels.no_name.to_string());

        Self {
            name,
            orcid: specialist.orcid.clone().filter(|o| !o.is_empty()),
            profile_link: specialist.profile_url.as_deref().and_then(safe_link),
            link_label: labels.view_profile,
        }
    }
}

impl fmt::Display for SpecialistCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {}", self.name)?;
        if let Some(orcid) = &self.orcid {
            write!(f, "\n  ORCID: {}", orcid)?;
        }
        if let Some(link) = &self.profile_link {
            write!(f, "\n  {}: {}", self.link_label, link)?;
        }
        Ok(())
    }
}

/// Contents of one result grid
#[derive(Debug, Clone, PartialEq)]
pub enum Grid<T> {
    /// No query issued yet
    Idle,
    Loading(&'static str),
    Cards(Vec<T>),
    /// Loaded with zero results
    Empty(&'static str),
    Failed(&'static str),
}

impl<T> Grid<T> {
    pub fn is_cards(&self) -> bool {
        matches!(self, Grid::Cards(_))
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grid::Idle => Ok(()),
            Grid::Loading(text) | Grid::Empty(text) | Grid::Failed(text) => write!(f, "  {}", text),
            Grid::Cards(cards) => {
                let lines: Vec<String> = cards.iter().map(ToString::to_string).collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub label: &'static str,
    pub target_page: u32,
    pub enabled: bool,
}

/// Prev/next controls for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub label: String,
    pub prev: Option<PageButton>,
    pub next: Option<PageButton>,
}

impl PaginationControls {
    /// `None` when everything fits on one page. Buttons are disabled while
    /// a request for this category is in flight.
    pub fn new(info: &PageInfo, current_page: u32, loading: bool, labels: &Labels) -> Option<Self> {
        if info.total_pages <= 1 {
            return None;
        }

        let button = |label, target_page| PageButton {
            label,
            target_page,
            enabled: !loading,
        };

        Some(Self {
            label: labels.page_of(current_page, info.total_pages),
            prev: info
                .has_prev
                .then(|| button(labels.previous, current_page.saturating_sub(1).max(1))),
            next: info.has_next.then(|| button(labels.next, current_page + 1)),
        })
    }
}

impl fmt::Display for PaginationControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |b: &PageButton| {
            if b.enabled {
                format!("[{}]", b.label)
            } else {
                format!("({})", b.label)
            }
        };
        let parts: Vec<String> = [
            self.prev.as_ref().map(render),
            Some(self.label.clone()),
            self.next.as_ref().map(render),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "  {}", parts.join("  "))
    }
}

/// One category: heading, grid and optional controls
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView<T> {
    pub heading: &'static str,
    pub grid: Grid<T>,
    pub controls: Option<PaginationControls>,
}

impl<T: fmt::Display> fmt::Display for SectionView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.heading)?;
        write!(f, "{}", self.grid)?;
        if let Some(controls) = &self.controls {
            write!(f, "\n{}", controls)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub articles: SectionView<ArticleCard>,
    pub specialists: SectionView<SpecialistCard>,
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.articles, self.specialists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn test_doi_url() {
        assert_eq!(doi_url("10.1234/abc").as_deref(), Some("https://doi.org/10.1234/abc"));
        assert_eq!(
            doi_url("https://doi.org/10.1234/abc").as_deref(),
            Some("https://doi.org/10.1234/abc")
        );
        assert_eq!(
            doi_url("http://doi.org/10.1234/abc").as_deref(),
            Some("https://doi.org/10.1234/abc")
        );
        assert_eq!(doi_url("  "), None);
        assert_eq!(doi_url("https://doi.org/"), None);
    }

    #[test]
    fn test_safe_link_requires_https() {
        assert_eq!(
            safe_link("https://orcid.org/0000-0001").as_deref(),
            Some("https://orcid.org/0000-0001")
        );
        assert_eq!(safe_link("http://orcid.org/0000-0001"), None);
        assert_eq!(safe_link("javascript:alert(1)"), None);
        assert_eq!(safe_link("not a url"), None);
    }

    #[test]
    fn test_article_card_defaults() {
        let labels = Language::En.labels();
        let card = ArticleCard::new(&Article::default(), labels);
        assert_eq!(card.title, "Untitled");
        assert_eq!(card.authors, None);
        assert_eq!(card.doi_link, None);
        assert!(!card.to_string().contains('\n'));
    }

    #[test]
    fn test_article_card_full() {
        let article = Article {
            title: Some("Deep learning".to_string()),
            authors: vec!["Y. LeCun".to_string(), "Y. Bengio".to_string()],
            year: Some(2015),
            doi: Some("https://doi.org/10.1038/nature14539".to_string()),
            url: Some("https://www.nature.com/articles/nature14539".to_string()),
            openalex_id: None,
        };
        let card = ArticleCard::new(&article, Language::Es.labels());
        assert_eq!(card.authors.as_deref(), Some("Y. LeCun, Y. Bengio"));
        assert_eq!(card.doi_link.as_deref(), Some("https://doi.org/10.1038/nature14539"));
        assert!(card.to_string().contains("Ver artículo: https://www.nature.com"));
    }

    #[test]
    fn test_specialist_card() {
        let labels = Language::Pt.labels();
        let insecure = Specialist {
            orcid: Some("0000-0002-1825-0097".to_string()),
            given_names: Some("Josiah".to_string()),
            family_names: Some("Carberry".to_string()),
            full_name: None,
            profile_url: Some("http://orcid.org/0000-0002-1825-0097".to_string()),
        };
        let card = SpecialistCard::new(&insecure, labels);
        assert_eq!(card.name, "Josiah Carberry");
        assert_eq!(card.profile_link, None);

        let card = SpecialistCard::new(&Specialist::default(), labels);
        assert_eq!(card.name, labels.no_name);
    }

    #[test]
    fn test_controls_first_of_three_pages() {
        let info = PageInfo {
            total: 12,
            total_pages: 3,
            has_prev: false,
            has_next: true,
        };
        let controls = PaginationControls::new(&info, 1, false, Language::En.labels()).unwrap();
        assert!(controls.prev.is_none());
        let next = controls.next.unwrap();
        assert!(next.enabled);
        assert_eq!(next.target_page, 2);
        assert_eq!(controls.label, "Page 1 of 3");
    }

    #[test]
    fn test_controls_hidden_for_single_page_and_disabled_while_loading() {
        let single = PageInfo {
            total: 4,
            total_pages: 1,
            has_prev: false,
            has_next: false,
        };
        assert!(PaginationControls::new(&single, 1, false, Language::Es.labels()).is_none());

        let middle = PageInfo {
            total: 18,
            total_pages: 3,
            has_prev: true,
            has_next: true,
        };
        let controls = PaginationControls::new(&middle, 2, true, Language::Es.labels()).unwrap();
        assert!(!controls.prev.as_ref().unwrap().enabled);
        assert!(!controls.next.as_ref().unwrap().enabled);
        assert_eq!(controls.to_string(), "  (Anterior)  Página 2 de 3  (Siguiente)");
    }
}
