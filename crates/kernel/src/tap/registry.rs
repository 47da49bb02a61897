//! Tap registry - indexes which handlers implement which taps.
//!
//! The registry maps tap names to an ordered list of handlers. Handlers are
//! sorted by weight (lower = higher priority, called first); equal weights
//! keep registration order.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use vitrine_sdk::types::{ContentTypeOption, ItemRecord};

use crate::repository::ItemQuery;

/// A resolver extension.
///
/// Implementors list the taps they handle in [`implements`](Self::implements)
/// and override the matching methods; the rest keep their no-op defaults.
pub trait PortfolioTap: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Tap names this handler implements.
    fn implements(&self) -> &[&'static str];

    fn alter_query(&self, _query: &mut ItemQuery) -> Result<()> {
        Ok(())
    }

    fn alter_item(&self, _item: &mut ItemRecord) -> Result<()> {
        Ok(())
    }

    fn alter_content_types(&self, _types: &mut Vec<ContentTypeOption>) -> Result<()> {
        Ok(())
    }
}

/// A registered tap handler with priority.
#[derive(Clone)]
pub struct TapHandler {
    pub tap: Arc<dyn PortfolioTap>,
    /// Weight for ordering (lower = higher priority).
    pub weight: i32,
}

impl std::fmt::Debug for TapHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapHandler")
            .field("tap", &self.tap.name())
            .field("weight", &self.weight)
            .finish()
    }
}

/// Registry mapping tap names to ordered handlers.
#[derive(Debug, Default)]
pub struct TapRegistry {
    handlers: HashMap<String, Vec<TapHandler>>,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under every tap it implements.
    pub fn register(&mut self, tap: Arc<dyn PortfolioTap>, weight: i32) {
        for tap_name in tap.implements() {
            let list = self.handlers.entry((*tap_name).to_string()).or_default();
            list.push(TapHandler {
                tap: Arc::clone(&tap),
                weight,
            });
            // Stable sort keeps registration order within a weight.
            list.sort_by_key(|h| h.weight);
        }
    }

    /// Get handlers for a tap, in weight order.
    ///
    /// Returns an empty slice if no handler implements the tap.
    pub fn get_handlers(&self, tap_name: &str) -> &[TapHandler] {
        self.handlers
            .get(tap_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Check if any handler implements a tap.
    pub fn has_tap(&self, tap_name: &str) -> bool {
        self.handlers
            .get(tap_name)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Get all registered tap names.
    pub fn tap_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|s| s.as_str())
    }

    /// Get the count of handlers for a tap.
    pub fn handler_count(&self, tap_name: &str) -> usize {
        self.handlers.get(tap_name).map(|v| v.len()).unwrap_or(0)
    }
}
