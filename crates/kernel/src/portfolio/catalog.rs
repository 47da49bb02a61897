//! Filter catalog and content-type discovery.
//!
//! Both results depend only on repository contents, so they are cached per
//! content-type selection until the TTL expires or [`CatalogService::invalidate`]
//! is called.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use vitrine_sdk::types::{CatalogEntry, ContentTypeOption, FilterCatalog, TaxonomyCatalog};

use crate::cache::CacheLayer;
use crate::content::ContentTypeRegistry;
use crate::metrics::Metrics;
use crate::models::TaxonomyRole;
use crate::repository::{ContentRepository, ItemQuery, TermCount};
use crate::tap::TapDispatcher;

const CONTENT_TYPES_KEY: &str = "content_types";

/// Builds filter catalogs and the list of selectable content types.
pub struct CatalogService {
    repo: Arc<dyn ContentRepository>,
    registry: ContentTypeRegistry,
    taps: TapDispatcher,
    metrics: Arc<Metrics>,
    catalogs: CacheLayer<Arc<FilterCatalog>>,
    content_types: CacheLayer<Arc<Vec<ContentTypeOption>>>,
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        registry: ContentTypeRegistry,
        taps: TapDispatcher,
        metrics: Arc<Metrics>,
        cache_ttl_secs: u64,
    ) -> Self {
        Self {
            repo,
            registry,
            taps,
            metrics,
            catalogs: CacheLayer::new(cache_ttl_secs),
            content_types: CacheLayer::new(cache_ttl_secs),
        }
    }

    /// Filter values available for a content-type selection.
    ///
    /// Only published items of the selected types are counted, items hidden
    /// by the `portfolio_query` stage are skipped, and entries with a zero
    /// count are omitted.
    pub async fn catalog(
        &self,
        post_types: &[String],
        include_commerce: bool,
    ) -> Result<Arc<FilterCatalog>> {
        let types = self.registry.resolve_selection(post_types, include_commerce);
        if types.is_empty() {
            return Ok(Arc::new(FilterCatalog::default()));
        }

        let key = CacheLayer::<Arc<FilterCatalog>>::selection_key("catalog", &types);
        if let Some(cached) = self.catalogs.get(&key).await {
            self.metrics.record_cache_hit();
            return Ok(cached);
        }
        self.metrics.record_cache_miss();

        let catalog = Arc::new(self.build_catalog(&types).await?);
        self.catalogs.insert(&key, Arc::clone(&catalog)).await;
        Ok(catalog)
    }

    /// Item ids the `portfolio_query` stage hides from an unfiltered
    /// listing of `types`.
    fn hidden_ids(&self, types: &[String]) -> Vec<i64> {
        let mut query = ItemQuery {
            types: types.to_vec(),
            page: 1,
            per_page: 1,
            ..Default::default()
        };
        self.taps.alter_query(&mut query);
        query.exclude_ids
    }

    async fn build_catalog(&self, types: &[String]) -> Result<FilterCatalog> {
        let taxonomies = self.registry.taxonomies_for(types);
        let names: Vec<String> = taxonomies.iter().map(|t| t.name.clone()).collect();
        let hidden = self.hidden_ids(types);
        let counts = self.repo.term_counts(types, &names, &hidden).await?;

        let mut catalog = FilterCatalog::default();

        for taxonomy in &taxonomies {
            let entries: Vec<CatalogEntry> = counts
                .iter()
                .filter(|c| c.term.taxonomy == taxonomy.name && c.count > 0)
                .map(entry)
                .collect();

            match taxonomy.role {
                TaxonomyRole::Category => catalog.categories.extend(entries),
                TaxonomyRole::Tag => catalog.tags.extend(entries),
                TaxonomyRole::Custom if !entries.is_empty() => {
                    catalog.taxonomies.insert(
                        taxonomy.name.clone(),
                        TaxonomyCatalog {
                            label: taxonomy.label.clone(),
                            hierarchical: taxonomy.hierarchical,
                            terms: entries,
                        },
                    );
                }
                TaxonomyRole::Custom => {}
            }
        }

        // Posts and products may both contribute categories or tags.
        catalog.categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        catalog.tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        catalog.authors = self
            .repo
            .author_counts(types, &hidden)
            .await?
            .into_iter()
            .filter(|c| c.count > 0)
            .map(|c| CatalogEntry {
                id: c.author.id,
                name: c.author.name,
                slug: c.author.slug,
                count: c.count,
            })
            .collect();

        debug!(
            types = ?types,
            categories = catalog.categories.len(),
            tags = catalog.tags.len(),
            taxonomies = catalog.taxonomies.len(),
            authors = catalog.authors.len(),
            "filter catalog built"
        );

        Ok(catalog)
    }

    /// Content types visitors may select, after the
    /// `portfolio_content_types` tap.
    pub async fn content_types(&self) -> Arc<Vec<ContentTypeOption>> {
        if let Some(cached) = self.content_types.get(CONTENT_TYPES_KEY).await {
            return cached;
        }

        let mut options: Vec<ContentTypeOption> = self
            .registry
            .discoverable()
            .into_iter()
            .map(|ct| ContentTypeOption {
                value: ct.name,
                label: ct.label,
            })
            .collect();
        self.taps.alter_content_types(&mut options);

        let options = Arc::new(options);
        self.content_types
            .insert(CONTENT_TYPES_KEY, Arc::clone(&options))
            .await;
        options
    }

    /// Drop every cached catalog and content-type list.
    pub fn invalidate(&self) {
        debug!("dropping cached catalogs");
        self.catalogs.invalidate_all();
        self.content_types.invalidate_all();
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("cache", &self.catalogs)
            .finish()
    }
}

fn entry(count: &TermCount) -> CatalogEntry {
    CatalogEntry {
        id: count.term.id,
        name: count.term.name.clone(),
        slug: count.term.slug.clone(),
        count: count.count,
    }
}
