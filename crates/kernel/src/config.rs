//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where the price symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    Left,
    Right,
    LeftSpace,
    RightSpace,
}

impl CurrencyPosition {
    fn parse(value: &str) -> Self {
        match value {
            "right" => Self::Right,
            "left_space" => Self::LeftSpace,
            "right_space" => Self::RightSpace,
            _ => Self::Left,
        }
    }
}

/// Price formatting settings for commerce items.
#[derive(Debug, Clone)]
pub struct PriceFormat {
    pub symbol: String,
    pub position: CurrencyPosition,
    pub decimals: u8,
    pub decimal_separator: String,
    pub thousand_separator: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: CurrencyPosition::Left,
            decimals: 2,
            decimal_separator: ".".to_string(),
            thousand_separator: ",".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. When unset the in-memory backend is used.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// YAML seed for the in-memory backend (default: ./seed/demo.yaml).
    pub seed_file: PathBuf,

    /// Public site URL used to build item and author links.
    pub site_url: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Content type treated as commerce products (default: "product").
    pub commerce_content_type: String,

    /// Page size when the request does not give one (default: 12).
    pub default_per_page: u32,

    /// Upper bound for `per_page` (default: 100).
    pub max_per_page: u32,

    /// Reject malformed `taxonomies` JSON with 400 instead of ignoring it.
    pub strict_taxonomy_filters: bool,

    /// Lifetime of cached filter catalogs in seconds; 0 disables caching.
    pub catalog_cache_ttl_secs: u64,

    /// Content types never offered for selection.
    pub excluded_content_types: Vec<String>,

    /// Item ids never returned by the resolver.
    pub excluded_item_ids: Vec<i64>,

    /// Price formatting for commerce items.
    pub price_format: PriceFormat,

    /// Bearer token for admin endpoints. Admin routes answer 404 when unset.
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            database_max_connections: 10,
            seed_file: PathBuf::from("./seed/demo.yaml"),
            site_url: "http://localhost:3000".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            commerce_content_type: "product".to_string(),
            default_per_page: 12,
            max_per_page: 100,
            strict_taxonomy_filters: false,
            catalog_cache_ttl_secs: 60,
            excluded_content_types: Vec::new(),
            excluded_item_ids: Vec::new(),
            price_format: PriceFormat::default(),
            admin_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let seed_file = env::var("SEED_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.seed_file);

        let site_url = env::var("SITE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let commerce_content_type =
            env::var("COMMERCE_CONTENT_TYPE").unwrap_or(defaults.commerce_content_type);

        let default_per_page: u32 = env::var("DEFAULT_PER_PAGE")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .context("DEFAULT_PER_PAGE must be a valid u32")?;

        let max_per_page: u32 = env::var("MAX_PER_PAGE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .context("MAX_PER_PAGE must be a valid u32")?;

        if max_per_page == 0 {
            anyhow::bail!("MAX_PER_PAGE must be at least 1");
        }

        let strict_taxonomy_filters = env::var("STRICT_TAXONOMY_FILTERS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let catalog_cache_ttl_secs = env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("CATALOG_CACHE_TTL_SECS must be a valid u64")?;

        let excluded_content_types = env::var("EXCLUDED_CONTENT_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let excluded_item_ids = env::var("PORTFOLIO_EXCLUDE_IDS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<i64>()
                            .with_context(|| format!("PORTFOLIO_EXCLUDE_IDS entry '{s}' is not an id"))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .unwrap_or_else(|_| Ok(Vec::new()))?;

        let price_format = PriceFormat {
            symbol: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".to_string()),
            position: CurrencyPosition::parse(
                &env::var("CURRENCY_POSITION")
                    .unwrap_or_else(|_| "left".to_string())
                    .to_lowercase(),
            ),
            decimals: env::var("PRICE_DECIMALS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("PRICE_DECIMALS must be a valid u8")?,
            decimal_separator: env::var("PRICE_DECIMAL_SEPARATOR")
                .unwrap_or_else(|_| ".".to_string()),
            thousand_separator: env::var("PRICE_THOUSAND_SEPARATOR")
                .unwrap_or_else(|_| ",".to_string()),
        };

        let admin_token = env::var("ADMIN_TOKEN").ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            seed_file,
            site_url,
            cors_allowed_origins,
            commerce_content_type,
            default_per_page: default_per_page.clamp(1, max_per_page),
            max_per_page,
            strict_taxonomy_filters,
            catalog_cache_ttl_secs,
            excluded_content_types,
            excluded_item_ids,
            price_format,
            admin_token,
        })
    }
}
