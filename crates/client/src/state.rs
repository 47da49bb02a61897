//! Controller state.
//!
//! Sets and maps are ordered so that a given state always serializes to the
//! same query string.

use std::collections::{BTreeMap, BTreeSet};

use vitrine_sdk::types::{FilterCatalog, ItemRecord, SortKey, SortOrder};

/// Which filter a term toggle applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Category,
    Tag,
    /// A custom taxonomy by name.
    Taxonomy(String),
}

/// Filter selections made by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Category term ids, ORed.
    pub categories: BTreeSet<i64>,
    /// Tag term ids, ORed.
    pub tags: BTreeSet<i64>,
    /// Term ids per taxonomy. Terms are ORed within a taxonomy and
    /// taxonomies are ANDed.
    pub taxonomy_terms: BTreeMap<String, BTreeSet<i64>>,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    pub author_id: Option<i64>,
    pub search_text: Option<String>,
}

impl FilterState {
    /// Add the term when absent, remove it when present.
    ///
    /// Returns whether the term is selected afterwards.
    pub fn toggle(&mut self, kind: &FilterKind, term: i64) -> bool {
        let set = match kind {
            FilterKind::Category => &mut self.categories,
            FilterKind::Tag => &mut self.tags,
            FilterKind::Taxonomy(name) => self.taxonomy_terms.entry(name.clone()).or_default(),
        };

        let selected = if set.remove(&term) {
            false
        } else {
            set.insert(term);
            true
        };

        if let FilterKind::Taxonomy(name) = kind
            && self.taxonomy_terms.get(name).is_some_and(BTreeSet::is_empty)
        {
            self.taxonomy_terms.remove(name);
        }

        selected
    }

    /// Whether a term is currently selected.
    pub fn is_selected(&self, kind: &FilterKind, term: i64) -> bool {
        match kind {
            FilterKind::Category => self.categories.contains(&term),
            FilterKind::Tag => self.tags.contains(&term),
            FilterKind::Taxonomy(name) => self
                .taxonomy_terms
                .get(name)
                .is_some_and(|terms| terms.contains(&term)),
        }
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// How successive pages are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// Each page is appended below the previous ones.
    #[default]
    LoadMore,
    /// Each page replaces the list; a numbered pager is shown.
    Numbered,
}

/// Paging position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub strategy: PaginationStrategy,
}

impl PaginationState {
    pub fn new(strategy: PaginationStrategy) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            strategy,
        }
    }

    /// Whether another page can be loaded or navigated to.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the message is shown with a retry control.
    Error(String),
}

/// Fixed settings of a controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Initially selected content types.
    pub post_types: Vec<String>,
    pub include_commerce: bool,
    pub per_page: u32,
    pub strategy: PaginationStrategy,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            post_types: vec!["post".to_string()],
            include_commerce: false,
            per_page: 12,
            strategy: PaginationStrategy::LoadMore,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

/// Everything the controller knows.
///
/// Only [`ControllerState::dispatch`](crate::reducer) mutates it.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub config: ControllerConfig,
    /// Current content-type selection.
    pub post_types: Vec<String>,
    pub filters: FilterState,
    pub sort: SortKey,
    pub order: SortOrder,
    pub pagination: PaginationState,
    pub phase: Phase,
    /// Working item collection.
    pub items: Vec<ItemRecord>,
    /// Matching items across all pages, as last reported by the server.
    pub total: u64,
    /// Filter values for the current selection, once loaded.
    pub catalog: Option<FilterCatalog>,
    /// Last sequence number handed out.
    pub(crate) last_seq: u64,
    /// Outstanding item fetch, if any.
    pub(crate) pending_items: Option<crate::action::PendingFetch>,
    /// Sequence number of the outstanding catalog fetch.
    pub(crate) pending_catalog: Option<u64>,
    /// The most recent item fetch, replayed by retry.
    pub(crate) last_items_fetch: Option<crate::action::PendingFetch>,
}

impl ControllerState {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            post_types: config.post_types.clone(),
            sort: config.sort,
            order: config.order,
            pagination: PaginationState::new(config.strategy),
            config,
            filters: FilterState::default(),
            phase: Phase::Idle,
            items: Vec::new(),
            total: 0,
            catalog: None,
            last_seq: 0,
            pending_items: None,
            pending_catalog: None,
            last_items_fetch: None,
        }
    }

    /// Whether the last completed fetch found nothing.
    pub fn is_empty_result(&self) -> bool {
        self.phase == Phase::Loaded && self.items.is_empty()
    }

    /// Whether the load-more control should be offered.
    pub fn can_load_more(&self) -> bool {
        self.pagination.strategy == PaginationStrategy::LoadMore
            && self.pagination.has_next()
            && self.phase != Phase::Loading
    }

    /// Sequence number of the latest item fetch still awaited.
    pub fn awaited_items(&self) -> Option<u64> {
        self.pending_items.as_ref().map(|p| p.seq)
    }

    pub(crate) fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut filters = FilterState::default();
        assert!(filters.toggle(&FilterKind::Category, 10));
        assert!(filters.is_selected(&FilterKind::Category, 10));
        assert!(!filters.toggle(&FilterKind::Category, 10));
        assert!(filters.is_empty());
    }

    #[test]
    fn emptied_taxonomies_are_removed() {
        let mut filters = FilterState::default();
        let skills = FilterKind::Taxonomy("skills".to_string());

        filters.toggle(&skills, 40);
        filters.toggle(&skills, 41);
        assert_eq!(filters.taxonomy_terms["skills"].len(), 2);

        filters.toggle(&skills, 40);
        filters.toggle(&skills, 41);
        assert!(!filters.taxonomy_terms.contains_key("skills"));
        assert!(filters.is_empty());
    }

    #[test]
    fn kinds_are_independent() {
        let mut filters = FilterState::default();
        filters.toggle(&FilterKind::Tag, 20);
        assert!(!filters.is_selected(&FilterKind::Category, 20));
        assert!(!filters.is_selected(&FilterKind::Taxonomy("skills".to_string()), 20));
    }

    #[test]
    fn load_more_needs_a_next_page() {
        let mut state = ControllerState::new(ControllerConfig::default());
        assert!(!state.can_load_more());

        state.pagination.total_pages = 2;
        state.phase = Phase::Loaded;
        assert!(state.can_load_more());

        state.pagination.current_page = 2;
        assert!(!state.can_load_more());
    }
}
