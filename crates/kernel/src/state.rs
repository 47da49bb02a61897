//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::content::{ContentTypeRegistry, PriceFormatter};
use crate::db;
use crate::metrics::Metrics;
use crate::portfolio::{CatalogService, ItemNormalizer, ParamPolicy, PortfolioResolver};
use crate::repository::{ContentRepository, MemoryRepository, PgRepository};
use crate::tap::{TapDispatcher, TapRegistry, default_registry};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Content repository backend.
    repo: Arc<dyn ContentRepository>,

    /// Content type registry.
    content_types: ContentTypeRegistry,

    /// Portfolio query resolver.
    resolver: PortfolioResolver,

    /// Filter catalog service.
    catalog: CatalogService,

    /// Prometheus metrics.
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create state with the backend selected by configuration.
    ///
    /// PostgreSQL is used when `DATABASE_URL` is set, otherwise the seed
    /// file is loaded into memory.
    pub async fn new(config: &Config) -> Result<Self> {
        let repo: Arc<dyn ContentRepository> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;
                db::run_migrations(&pool).await?;
                info!("PostgreSQL repository ready");
                Arc::new(PgRepository::new(pool))
            }
            None => {
                let repo = MemoryRepository::load(&config.seed_file)?;
                info!(
                    seed = %config.seed_file.display(),
                    items = repo.item_count(),
                    "in-memory repository loaded"
                );
                Arc::new(repo)
            }
        };

        Self::with_repository(config, repo, default_registry(config)).await
    }

    /// Create state over an existing repository and tap registry.
    pub async fn with_repository(
        config: &Config,
        repo: Arc<dyn ContentRepository>,
        taps: TapRegistry,
    ) -> Result<Self> {
        let content_types =
            ContentTypeRegistry::load(repo.as_ref(), &config.commerce_content_type)
                .await
                .context("failed to load content types")?;

        let metrics = Arc::new(Metrics::new());
        let taps = TapDispatcher::new(Arc::new(taps));

        let normalizer = ItemNormalizer::new(
            content_types.clone(),
            PriceFormatter::new(config.price_format.clone()),
            &config.site_url,
        );
        let resolver = PortfolioResolver::new(
            Arc::clone(&repo),
            content_types.clone(),
            normalizer,
            taps.clone(),
            Arc::clone(&metrics),
        );
        let catalog = CatalogService::new(
            Arc::clone(&repo),
            content_types.clone(),
            taps,
            Arc::clone(&metrics),
            config.catalog_cache_ttl_secs,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                repo,
                content_types,
                resolver,
                catalog,
                metrics,
            }),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Parameter interpretation policy derived from configuration.
    pub fn param_policy(&self) -> ParamPolicy {
        ParamPolicy {
            default_per_page: self.inner.config.default_per_page,
            max_per_page: self.inner.config.max_per_page,
            strict_taxonomies: self.inner.config.strict_taxonomy_filters,
        }
    }

    /// Get the content repository.
    pub fn repository(&self) -> &Arc<dyn ContentRepository> {
        &self.inner.repo
    }

    /// Get the content type registry.
    pub fn content_types(&self) -> &ContentTypeRegistry {
        &self.inner.content_types
    }

    /// Get the portfolio resolver.
    pub fn resolver(&self) -> &PortfolioResolver {
        &self.inner.resolver
    }

    /// Get the catalog service.
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get the metrics registry.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.inner.metrics
    }

    /// Check if the repository backend is reachable.
    pub async fn repository_healthy(&self) -> bool {
        self.inner.repo.health().await
    }
}
