//! Tap system for resolver extension points.
//!
//! Taps are named stages in the resolver where registered handlers may
//! rewrite the item query, each normalized item, or the list of offered
//! content types. Handlers are registered once at startup and called in
//! weight order (lower = higher priority).

mod builtin;
mod dispatcher;
mod registry;

pub use builtin::{ExcludeContentTypes, ExcludeItems, default_registry};
pub use dispatcher::TapDispatcher;
pub use registry::{PortfolioTap, TapHandler, TapRegistry};

/// Alters the [`ItemQuery`](crate::repository::ItemQuery) before execution.
pub const TAP_PORTFOLIO_QUERY: &str = "portfolio_query";

/// Alters each normalized item record.
pub const TAP_PORTFOLIO_ITEM: &str = "portfolio_item";

/// Alters the content-type options offered to visitors.
pub const TAP_PORTFOLIO_CONTENT_TYPES: &str = "portfolio_content_types";
