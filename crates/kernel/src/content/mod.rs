//! Content module.
//!
//! This module provides:
//! - ContentTypeRegistry: content type and taxonomy definitions
//! - Seed: YAML seed documents for the in-memory repository and imports
//! - PriceFormatter: commerce price data and markup
//! - text: excerpt generation and HTML sanitizing

pub mod price;
pub mod seed;
pub mod text;
mod type_registry;

pub use price::PriceFormatter;
pub use seed::{Seed, SeedItem};
pub use type_registry::ContentTypeRegistry;
