//! Prometheus metrics collection.
//!
//! Provides application metrics in Prometheus format.

use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;

/// HTTP request labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    pub method: String,
    pub path: String,
    pub status: u16,
}

/// Application metrics.
pub struct Metrics {
    registry: Registry,

    /// HTTP request counter by method/path/status.
    pub http_requests: Family<HttpLabels, Counter>,

    /// HTTP request duration histogram.
    pub http_duration_seconds: Family<HttpLabels, Histogram>,

    /// Repository time spent resolving one item query.
    pub resolver_duration_seconds: Histogram,

    /// Filter catalog cache hits.
    pub catalog_cache_hits: Counter,

    /// Filter catalog cache misses.
    pub catalog_cache_misses: Counter,
}

impl Metrics {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests = Family::<HttpLabels, Counter>::default();
        registry.register(
            "http_requests_total",
            "Total HTTP requests",
            http_requests.clone(),
        );

        let http_duration_seconds = Family::<HttpLabels, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 12))
        });
        registry.register(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_duration_seconds.clone(),
        );

        let resolver_duration_seconds = Histogram::new(exponential_buckets(0.0001, 2.0, 14));
        registry.register(
            "portfolio_query_duration_seconds",
            "Portfolio item query duration in seconds",
            resolver_duration_seconds.clone(),
        );

        let catalog_cache_hits = Counter::default();
        registry.register(
            "catalog_cache_hits_total",
            "Filter catalog cache hit count",
            catalog_cache_hits.clone(),
        );

        let catalog_cache_misses = Counter::default();
        registry.register(
            "catalog_cache_misses_total",
            "Filter catalog cache miss count",
            catalog_cache_misses.clone(),
        );

        Self {
            registry,
            http_requests,
            http_duration_seconds,
            resolver_duration_seconds,
            catalog_cache_hits,
            catalog_cache_misses,
        }
    }

    /// Record an HTTP request.
    pub fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = HttpLabels {
            method: method.to_string(),
            path: normalize_path(path),
            status,
        };

        self.http_requests.get_or_create(&labels).inc();
        self.http_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Record one resolver query.
    pub fn record_query(&self, duration_secs: f64) {
        self.resolver_duration_seconds.observe(duration_secs);
    }

    /// Record a catalog cache hit.
    pub fn record_cache_hit(&self) {
        self.catalog_cache_hits.inc();
    }

    /// Record a catalog cache miss.
    pub fn record_cache_miss(&self) {
        self.catalog_cache_misses.inc();
    }

    /// Encode metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

/// Normalize a path for metrics labels.
///
/// Replaces numeric segments with a placeholder to limit cardinality.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|s| {
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                s
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
