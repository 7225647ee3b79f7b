//! Client side of OLASIS: API access, paging state, result view models,
//! chat session and persisted preferences.

pub mod api;
pub mod pagination;
pub mod preferences;
pub mod render;
pub mod session;

pub use api::OlasisClient;
pub use pagination::{Category, Direction, FetchTicket, LoadState, SearchSession};
pub use preferences::{PreferenceStore, Preferences};
pub use render::{doi_url, safe_link, ArticleCard, Grid, PaginationControls, ResultsView, SpecialistCard};
pub use session::ChatSession;
