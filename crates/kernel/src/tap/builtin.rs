//! Built-in tap handlers driven by configuration.

use std::sync::Arc;

use anyhow::Result;
use vitrine_sdk::types::ContentTypeOption;

use super::{PortfolioTap, TAP_PORTFOLIO_CONTENT_TYPES, TAP_PORTFOLIO_QUERY, TapRegistry};
use crate::config::Config;
use crate::repository::ItemQuery;

/// Hides configured item ids from every query (`PORTFOLIO_EXCLUDE_IDS`).
#[derive(Debug, Clone)]
pub struct ExcludeItems {
    ids: Vec<i64>,
}

impl ExcludeItems {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids }
    }
}

impl PortfolioTap for ExcludeItems {
    fn name(&self) -> &str {
        "exclude_items"
    }

    fn implements(&self) -> &[&'static str] {
        &[TAP_PORTFOLIO_QUERY]
    }

    fn alter_query(&self, query: &mut ItemQuery) -> Result<()> {
        for id in &self.ids {
            if !query.exclude_ids.contains(id) {
                query.exclude_ids.push(*id);
            }
        }
        Ok(())
    }
}

/// Removes configured types from the offered list (`EXCLUDED_CONTENT_TYPES`).
#[derive(Debug, Clone)]
pub struct ExcludeContentTypes {
    names: Vec<String>,
}

impl ExcludeContentTypes {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl PortfolioTap for ExcludeContentTypes {
    fn name(&self) -> &str {
        "exclude_content_types"
    }

    fn implements(&self) -> &[&'static str] {
        &[TAP_PORTFOLIO_CONTENT_TYPES]
    }

    fn alter_content_types(&self, types: &mut Vec<ContentTypeOption>) -> Result<()> {
        types.retain(|t| !self.names.contains(&t.value));
        Ok(())
    }
}

/// Registry with the built-in handlers enabled by `config`.
pub fn default_registry(config: &Config) -> TapRegistry {
    let mut registry = TapRegistry::new();
    if !config.excluded_item_ids.is_empty() {
        registry.register(
            Arc::new(ExcludeItems::new(config.excluded_item_ids.clone())),
            0,
        );
    }
    if !config.excluded_content_types.is_empty() {
        registry.register(
            Arc::new(ExcludeContentTypes::new(
                config.excluded_content_types.clone(),
            )),
            0,
        );
    }
    registry
}
