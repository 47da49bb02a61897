//! Tap dispatcher - invokes tap handlers in weight order.
//!
//! Each handler receives the value left by the previous one. Errors are
//! logged and skipped, allowing other handlers to continue.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error};
use vitrine_sdk::types::{ContentTypeOption, ItemRecord};

use super::{
    PortfolioTap, TAP_PORTFOLIO_CONTENT_TYPES, TAP_PORTFOLIO_ITEM, TAP_PORTFOLIO_QUERY,
    TapRegistry,
};
use crate::repository::ItemQuery;

/// Dispatcher for invoking taps across handlers.
#[derive(Debug, Clone)]
pub struct TapDispatcher {
    registry: Arc<TapRegistry>,
}

impl TapDispatcher {
    pub fn new(registry: Arc<TapRegistry>) -> Self {
        Self { registry }
    }

    /// Get the tap registry for handler introspection.
    pub fn registry(&self) -> &TapRegistry {
        &self.registry
    }

    /// Run the `portfolio_query` stage.
    pub fn alter_query(&self, query: &mut ItemQuery) {
        self.run(TAP_PORTFOLIO_QUERY, |tap| tap.alter_query(query));
    }

    /// Run the `portfolio_item` stage.
    pub fn alter_item(&self, item: &mut ItemRecord) {
        self.run(TAP_PORTFOLIO_ITEM, |tap| tap.alter_item(item));
    }

    /// Run the `portfolio_content_types` stage.
    pub fn alter_content_types(&self, types: &mut Vec<ContentTypeOption>) {
        self.run(TAP_PORTFOLIO_CONTENT_TYPES, |tap| tap.alter_content_types(types));
    }

    fn run(&self, tap_name: &str, mut invoke: impl FnMut(&dyn PortfolioTap) -> Result<()>) {
        let handlers = self.registry.get_handlers(tap_name);
        if handlers.is_empty() {
            return;
        }

        for handler in handlers {
            if let Err(e) = invoke(handler.tap.as_ref()) {
                error!(
                    handler = %handler.tap.name(),
                    tap = %tap_name,
                    error = %e,
                    "tap invocation failed"
                );
            }
        }

        debug!(tap = %tap_name, handlers = handlers.len(), "dispatch complete");
    }
}
