//! Portfolio query resolver.
//!
//! Translates a [`PortfolioRequest`] into an [`ItemQuery`], runs it against
//! the content repository and normalizes the results.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;
use vitrine_sdk::types::PortfolioPage;

use super::normalize::ItemNormalizer;
use super::params::PortfolioRequest;
use crate::content::ContentTypeRegistry;
use crate::metrics::Metrics;
use crate::models::{Taxonomy, TaxonomyRole};
use crate::repository::{ContentRepository, ItemQuery};
use crate::tap::TapDispatcher;

/// Resolves portfolio requests into pages of item records.
pub struct PortfolioResolver {
    repo: Arc<dyn ContentRepository>,
    registry: ContentTypeRegistry,
    normalizer: ItemNormalizer,
    taps: TapDispatcher,
    metrics: Arc<Metrics>,
}

impl PortfolioResolver {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        registry: ContentTypeRegistry,
        normalizer: ItemNormalizer,
        taps: TapDispatcher,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repo,
            registry,
            normalizer,
            taps,
            metrics,
        }
    }

    /// Resolve a request into one page of results.
    ///
    /// A selection with no queryable content type yields an empty page.
    pub async fn resolve(&self, request: &PortfolioRequest) -> Result<PortfolioPage> {
        let Some(mut query) = self.build_query(request).await? else {
            return Ok(PortfolioPage::empty(request.page, request.per_page));
        };

        self.taps.alter_query(&mut query);

        let started = Instant::now();
        let page = self.repo.query_items(&query).await?;
        self.metrics.record_query(started.elapsed().as_secs_f64());

        let mut records = self
            .normalizer
            .normalize_all(self.repo.as_ref(), &page.items)
            .await?;
        for record in &mut records {
            self.taps.alter_item(record);
        }

        debug!(
            types = ?query.types,
            facets = query.facets.len(),
            total = page.total,
            returned = records.len(),
            "portfolio query resolved"
        );

        Ok(PortfolioPage::new(
            records,
            page.total,
            query.page,
            query.per_page,
        ))
    }

    /// Build the repository query, or `None` when no type survives the
    /// whitelist.
    pub async fn build_query(&self, request: &PortfolioRequest) -> Result<Option<ItemQuery>> {
        let types = self
            .registry
            .resolve_selection(&request.post_types, request.include_commerce);
        if types.is_empty() {
            debug!(requested = ?request.post_types, "no queryable content type selected");
            return Ok(None);
        }

        let attached = self.registry.taxonomies_for(&types);
        let mut facets = Vec::new();

        if let Some(facet) = self
            .role_facet(&request.categories, TaxonomyRole::Category, &attached)
            .await?
        {
            facets.push(facet);
        }
        if let Some(facet) = self
            .role_facet(&request.tags, TaxonomyRole::Tag, &attached)
            .await?
        {
            facets.push(facet);
        }

        for (taxonomy, ids) in &request.taxonomies {
            if !attached.iter().any(|t| &t.name == taxonomy) {
                debug!(taxonomy = %taxonomy, "dropping filter on taxonomy not attached to selection");
                continue;
            }
            let terms = self.repo.terms_by_ids(ids).await?;
            let facet: Vec<i64> = ids
                .iter()
                .copied()
                .filter(|id| terms.iter().any(|t| t.id == *id && &t.taxonomy == taxonomy))
                .collect();
            if facet.is_empty() {
                debug!(taxonomy = %taxonomy, ids = ?ids, "dropping taxonomy filter with no known terms");
            } else {
                facets.push(facet);
            }
        }

        Ok(Some(ItemQuery {
            types,
            facets,
            exclude_ids: Vec::new(),
            created_from: request.date_from.and_then(start_of_day),
            created_to: request.date_to.and_then(end_of_day),
            author_id: request.author,
            search: request.search.clone(),
            sort: request.sort,
            order: request.order,
            page: request.page,
            per_page: request.per_page,
        }))
    }

    /// One facet from category or tag ids.
    ///
    /// Each id is kept only when its term belongs to a taxonomy of `role`
    /// attached to the selection. The per-taxonomy partitions are ORed, so
    /// they share one facet.
    async fn role_facet(
        &self,
        ids: &[i64],
        role: TaxonomyRole,
        attached: &[Taxonomy],
    ) -> Result<Option<Vec<i64>>> {
        if ids.is_empty() {
            return Ok(None);
        }

        let terms = self.repo.terms_by_ids(ids).await?;
        let facet: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| {
                terms.iter().any(|term| {
                    term.id == *id
                        && attached
                            .iter()
                            .any(|tax| tax.name == term.taxonomy && tax.role == role)
                })
            })
            .collect();

        if facet.len() < ids.len() {
            debug!(role = role.as_str(), requested = ?ids, kept = ?facet, "dropped unresolvable term ids");
        }

        Ok((!facet.is_empty()).then_some(facet))
    }
}

impl std::fmt::Debug for PortfolioResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioResolver")
            .field("backend", &self.repo.backend())
            .finish()
    }
}

/// 00:00:00 UTC of `date` as unix seconds.
fn start_of_day(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp())
}

/// 23:59:59 UTC of `date` as unix seconds.
fn end_of_day(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc().timestamp())
}
