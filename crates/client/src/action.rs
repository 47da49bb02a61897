//! Actions fed to the reducer and the effects it asks the driver to run.

use vitrine_sdk::params::CatalogParams;
use vitrine_sdk::types::{FilterCatalog, PortfolioPage, SortKey, SortOrder};

use crate::request::QueryRequest;
use crate::state::FilterKind;

/// Something that happened: a user interaction or a fetch outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// First display: load items and the filter catalog.
    Mount,
    ToggleFilter { kind: FilterKind, term: i64 },
    /// Set or clear (`None` or blank) the free-text search.
    SetSearch(Option<String>),
    SetDateRange {
        from: Option<String>,
        to: Option<String>,
    },
    SetAuthor(Option<i64>),
    SetSort { key: SortKey, order: SortOrder },
    /// Change the content-type selection; clears filters.
    SetContentTypes(Vec<String>),
    /// Jump to a page, replacing the list.
    GoToPage(u32),
    /// Append the next page.
    LoadMore,
    ResetFilters,
    /// Repeat the last failed items fetch.
    Retry,
    ItemsLoaded { seq: u64, page: PortfolioPage },
    ItemsFailed { seq: u64, message: String },
    CatalogLoaded { seq: u64, catalog: FilterCatalog },
    CatalogFailed { seq: u64, message: String },
}

/// Work the driver must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchItems { seq: u64, request: QueryRequest },
    FetchCatalog { seq: u64, params: CatalogParams },
}

impl Effect {
    pub fn seq(&self) -> u64 {
        match self {
            Self::FetchItems { seq, .. } | Self::FetchCatalog { seq, .. } => *seq,
        }
    }
}

/// How a completed items fetch changes the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

/// An items fetch that has been issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub request: QueryRequest,
    pub mode: FetchMode,
}
