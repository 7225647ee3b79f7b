//! Client-side search session and paging state.
//!
//! Each result category pages independently. Every request gets a ticket
//! with a sequence number; a response is applied to a category only if
//! that category's latest ticket is the one it answers, so a slow earlier
//! response can never overwrite a newer one.

use super::render::{ArticleCard, Grid, PaginationControls, ResultsView, SectionView, SpecialistCard};
use crate::i18n::{Labels, Language};
use crate::openalex::Article;
use crate::orcid::Specialist;
use crate::search::{PageInfo, SearchResponse};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Articles,
    Specialists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// One issued search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: String,
    pub page: u32,
    /// `None` for a new query, which refreshes both categories
    pub category: Option<Category>,
}

impl FetchTicket {
    fn covers(&self, category: Category) -> bool {
        self.category.is_none() || self.category == Some(category)
    }
}

#[derive(Debug, Clone)]
struct CategoryState<T> {
    page: u32,
    items: Vec<T>,
    /// From the last successful response
    info: Option<PageInfo>,
    state: LoadState,
    pending: Option<u64>,
}

impl<T> Default for CategoryState<T> {
    fn default() -> Self {
        Self {
            page: 1,
            items: Vec::new(),
            info: None,
            state: LoadState::Idle,
            pending: None,
        }
    }
}

impl<T: Clone> CategoryState<T> {
    fn start(&mut self, seq: u64) {
        self.state = LoadState::Loading;
        self.pending = Some(seq);
    }

    fn can_move(&self, direction: Direction) -> bool {
        if self.pending.is_some() {
            return false;
        }
        match (self.info, direction) {
            (Some(info), Direction::Prev) => info.has_prev,
            (Some(info), Direction::Next) => info.has_next,
            (None, _) => false,
        }
    }

    fn finish(&mut self, page: u32, outcome: Option<(&[T], PageInfo)>) {
        self.pending = None;
        match outcome {
            Some((items, info)) => {
                self.page = page;
                self.items = items.to_vec();
                self.info = Some(info);
                self.state = LoadState::Loaded;
            }
            None => {
                self.items.clear();
                self.state = LoadState::Error;
            }
        }
    }

    fn section<C>(
        &self,
        heading: &'static str,
        empty: &'static str,
        labels: &Labels,
        card: impl Fn(&T) -> C,
    ) -> SectionView<C> {
        let grid = match self.state {
            LoadState::Idle => Grid::Idle,
            LoadState::Loading => Grid::Loading(labels.loading),
            LoadState::Error => Grid::Failed(labels.error_loading),
            LoadState::Loaded if self.items.is_empty() => Grid::Empty(empty),
            LoadState::Loaded => Grid::Cards(self.items.iter().map(card).collect()),
        };

        let controls = match self.state {
            LoadState::Loaded | LoadState::Loading => self
                .info
                .as_ref()
                .and_then(|info| PaginationControls::new(info, self.page, self.pending.is_some(), labels)),
            _ => None,
        };

        SectionView {
            heading,
            grid,
            controls,
        }
    }
}

/// Paging state for one user's searches.
#[derive(Debug, Default)]
pub struct SearchSession {
    query: Option<String>,
    last_seq: u64,
    articles: CategoryState<Article>,
    specialists: CategoryState<Specialist>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn page(&self, category: Category) -> u32 {
        match category {
            Category::Articles => self.articles.page,
            Category::Specialists => self.specialists.page,
        }
    }

    pub fn state(&self, category: Category) -> LoadState {
        match category {
            Category::Articles => self.articles.state,
            Category::Specialists => self.specialists.state,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    /// Start a new search at page 1. Blank queries issue nothing.
    pub fn submit(&mut self, query: &str) -> Option<FetchTicket> {
        self.submit_at(query, 1)
    }

    /// Like [`submit`](Self::submit) but starting both categories at `page`.
    /// Pages below 1 are treated as page 1.
    pub fn submit_at(&mut self, query: &str, page: u32) -> Option<FetchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let seq = self.next_seq();
        self.query = Some(query.to_string());
        self.articles = CategoryState::default();
        self.specialists = CategoryState::default();
        self.articles.start(seq);
        self.specialists.start(seq);

        let page = page.max(1);
        debug!(seq = seq, query = query, page = page, "Search submitted");
        Some(FetchTicket {
            seq,
            query: query.to_string(),
            page,
            category: None,
        })
    }

    /// Move one category a page back or forward.
    ///
    /// Only allowed when the last successful response says that page
    /// exists and no request for the category is in flight.
    pub fn request_page(&mut self, category: Category, direction: Direction) -> Option<FetchTicket> {
        let query = self.query.clone()?;
        let current = self.page(category);
        let allowed = match category {
            Category::Articles => self.articles.can_move(direction),
            Category::Specialists => self.specialists.can_move(direction),
        };
        if !allowed {
            return None;
        }

        let page = match direction {
            Direction::Prev => current.saturating_sub(1).max(1),
            Direction::Next => current + 1,
        };
        let seq = self.next_seq();
        match category {
            Category::Articles => self.articles.start(seq),
            Category::Specialists => self.specialists.start(seq),
        }

        debug!(seq = seq, ?category, page = page, "Page requested");
        Some(FetchTicket {
            seq,
            query,
            page,
            category: Some(category),
        })
    }

    /// Apply a finished request. Returns `false` when the ticket is stale
    /// for every category it covers.
    pub fn apply<E: fmt::Display>(&mut self, ticket: &FetchTicket, outcome: Result<SearchResponse, E>) -> bool {
        let current_articles = ticket.covers(Category::Articles) && self.articles.pending == Some(ticket.seq);
        let current_specialists =
            ticket.covers(Category::Specialists) && self.specialists.pending == Some(ticket.seq);

        if !current_articles && !current_specialists {
            debug!(seq = ticket.seq, "Discarding stale search response");
            return false;
        }

        match &outcome {
            Ok(response) => {
                if current_articles {
                    self.articles.finish(
                        ticket.page,
                        Some((response.articles.as_slice(), response.pagination.articles)),
                    );
                }
                if current_specialists {
                    self.specialists.finish(
                        ticket.page,
                        Some((response.specialists.as_slice(), response.pagination.specialists)),
                    );
                }
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "Search request failed");
                if current_articles {
                    self.articles.finish(ticket.page, None);
                }
                if current_specialists {
                    self.specialists.finish(ticket.page, None);
                }
            }
        }
        true
    }

    pub fn view(&self, lang: Language) -> ResultsView {
        let labels = lang.labels();
        ResultsView {
            articles: self.articles.section(labels.articles_heading, labels.no_articles, labels, |a| {
                ArticleCard::new(a, labels)
            }),
            specialists: self
                .specialists
                .section(labels.specialists_heading, labels.no_specialists, labels, |s| {
                    SpecialistCard::new(s, labels)
                }),
        }
    }

    /// Re-render for a new language without refetching. `None` until a
    /// query has been issued.
    pub fn relabel(&self, lang: Language) -> Option<ResultsView> {
        self.query.as_ref().map(|_| self.view(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OlasisError;
    use crate::search::Pagination;

    fn specialists(n: usize) -> Vec<Specialist> {
        (0..n)
            .map(|i| Specialist {
                orcid: Some(format!("0000-0000-0000-{:04}", i)),
                full_name: Some(format!("Researcher {}", i)),
                ..Default::default()
            })
            .collect()
    }

    fn response(page: u32, spec: PageInfo, count: usize) -> SearchResponse {
        SearchResponse {
            articles: Vec::new(),
            specialists: specialists(count),
            pagination: Pagination {
                current_page: page,
                per_page: 6,
                articles: PageInfo::default(),
                specialists: spec,
            },
        }
    }

    fn three_pages(page: u32) -> PageInfo {
        PageInfo {
            total: 12,
            total_pages: 3,
            has_prev: page > 1,
            has_next: page < 3,
        }
    }

    #[test]
    fn test_submit_at_clamps_page_zero() {
        let mut session = SearchSession::new();
        let ticket = session.submit_at("ecology", 0).unwrap();
        assert_eq!(ticket.page, 1);

        assert!(session.apply::<OlasisError>(&ticket, Ok(response(1, three_pages(1), 6))));
        assert_eq!(session.page(Category::Specialists), 1);
        let view = session.view(Language::En);
        assert_eq!(view.specialists.controls.unwrap().label, "Page 1 of 3");
    }

    #[test]
    fn test_blank_query_issues_nothing() {
        let mut session = SearchSession::new();
        assert!(session.submit("   ").is_none());
        assert_eq!(session.state(Category::Articles), LoadState::Idle);
        assert!(session.relabel(Language::En).is_none());
    }

    #[test]
    fn test_submit_then_next() {
        let mut session = SearchSession::new();
        let ticket = session.submit("  machine learning ").unwrap();
        assert_eq!(ticket.query, "machine learning");
        assert_eq!(ticket.page, 1);
        assert_eq!(session.state(Category::Specialists), LoadState::Loading);

        assert!(session.apply::<OlasisError>(&ticket, Ok(response(1, three_pages(1), 6))));
        assert_eq!(session.state(Category::Specialists), LoadState::Loaded);

        // no previous page and articles have nothing to page through
        assert!(session.request_page(Category::Specialists, Direction::Prev).is_none());
        assert!(session.request_page(Category::Articles, Direction::Next).is_none());

        let next = session.request_page(Category::Specialists, Direction::Next).unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(next.category, Some(Category::Specialists));

        // in flight: a second click does nothing
        assert!(session.request_page(Category::Specialists, Direction::Next).is_none());
        let view = session.view(Language::En);
        assert!(!view.specialists.controls.unwrap().next.unwrap().enabled);

        assert!(session.apply::<OlasisError>(&next, Ok(response(2, three_pages(2), 6))));
        assert_eq!(session.page(Category::Specialists), 2);
        assert_eq!(session.page(Category::Articles), 1);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut session = SearchSession::new();
        let old = session.submit("old query").unwrap();
        let new = session.submit("new query").unwrap();
        assert!(new.seq > old.seq);

        assert!(!session.apply::<OlasisError>(&old, Ok(response(1, three_pages(1), 6))));
        assert_eq!(session.state(Category::Specialists), LoadState::Loading);

        assert!(session.apply::<OlasisError>(&new, Ok(response(1, three_pages(1), 2))));
        let view = session.view(Language::En);
        match view.specialists.grid {
            Grid::Cards(cards) => assert_eq!(cards.len(), 2),
            other => panic!("expected cards, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_shows_error_placeholder() {
        let mut session = SearchSession::new();
        let ticket = session.submit("x").unwrap();
        assert!(session.apply(&ticket, Err(OlasisError::Parse("boom".to_string()))));

        let labels = Language::Pt.labels();
        let view = session.view(Language::Pt);
        assert_eq!(view.articles.grid, Grid::Failed(labels.error_loading));
        assert_eq!(view.specialists.grid, Grid::Failed(labels.error_loading));
        assert!(view.articles.controls.is_none());
    }

    #[test]
    fn test_relabel_keeps_data() {
        let mut session = SearchSession::new();
        let ticket = session.submit("x").unwrap();
        session.apply::<OlasisError>(&ticket, Ok(response(1, three_pages(1), 6)));

        let es = session.relabel(Language::Es).unwrap();
        let en = session.relabel(Language::En).unwrap();
        assert_eq!(es.specialists.controls.unwrap().label, "Página 1 de 3");
        assert_eq!(en.specialists.controls.unwrap().label, "Page 1 of 3");
        assert_eq!(en.articles.grid, Grid::Empty("No articles found."));
    }
}
