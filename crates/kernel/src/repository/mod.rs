//! Content repository access.
//!
//! The resolver talks to storage through [`ContentRepository`]. Two backends
//! exist: PostgreSQL for production and an in-memory store loaded from a
//! seed file for development and tests.

mod memory;
mod postgres;
pub mod query_builder;

use anyhow::Result;
use async_trait::async_trait;
use vitrine_sdk::types::{SortKey, SortOrder};

use crate::models::{Author, ContentType, Item, Taxonomy, Term};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// A fully resolved item query.
///
/// Only published items are ever matched; the status is not part of the
/// query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    /// Content types to include. Must not be empty.
    pub types: Vec<String>,

    /// Term facets. An item matches a facet when it carries any of the
    /// facet's terms; it must match every facet.
    pub facets: Vec<Vec<i64>>,

    /// Item ids never returned.
    pub exclude_ids: Vec<i64>,

    /// Inclusive lower bound on publish time (unix seconds).
    pub created_from: Option<i64>,

    /// Inclusive upper bound on publish time (unix seconds).
    pub created_to: Option<i64>,

    pub author_id: Option<i64>,

    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,

    pub sort: SortKey,
    pub order: SortOrder,

    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl ItemQuery {
    /// Offset of the first row of the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// One page of stored items plus the total match count.
#[derive(Debug, Clone, Default)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total: u64,
}

/// Occurrence count of a term over published items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub term: Term,
    pub count: u64,
}

/// Occurrence count of an author over published items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCount {
    pub author: Author,
    pub count: u64,
}

/// Read access to the content repository.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn content_types(&self) -> Result<Vec<ContentType>>;

    async fn taxonomies(&self) -> Result<Vec<Taxonomy>>;

    /// Terms with the given ids. Unknown ids are absent from the result.
    async fn terms_by_ids(&self, ids: &[i64]) -> Result<Vec<Term>>;

    /// Authors with the given ids. Unknown ids are absent from the result.
    async fn authors_by_ids(&self, ids: &[i64]) -> Result<Vec<Author>>;

    /// Execute an item query. Returned items carry their term ids.
    async fn query_items(&self, query: &ItemQuery) -> Result<ItemPage>;

    /// Counts of terms from `taxonomies` over published items of `types`,
    /// skipping items in `exclude_ids`. Terms used by no such item are
    /// omitted.
    async fn term_counts(
        &self,
        types: &[String],
        taxonomies: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<TermCount>>;

    /// Counts of authors over published items of `types`, skipping items in
    /// `exclude_ids`. Authors of no such item are omitted.
    async fn author_counts(
        &self,
        types: &[String],
        exclude_ids: &[i64],
    ) -> Result<Vec<AuthorCount>>;

    /// Whether the backend is reachable.
    async fn health(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_from_page() {
        let query = ItemQuery {
            page: 3,
            per_page: 12,
            ..Default::default()
        };
        assert_eq!(query.offset(), 24);

        let first = ItemQuery {
            page: 1,
            per_page: 12,
            ..Default::default()
        };
        assert_eq!(first.offset(), 0);
    }
}
