//! Portfolio query service.
//!
//! This module provides:
//! - PortfolioRequest: interpretation of raw request parameters
//! - PortfolioResolver: request to repository query to normalized page
//! - ItemNormalizer: stored item to API item record
//! - CatalogService: filter catalog and content-type discovery

mod catalog;
mod normalize;
pub mod params;
mod resolver;

pub use catalog::CatalogService;
pub use normalize::ItemNormalizer;
pub use params::{ParamError, ParamPolicy, PortfolioRequest};
pub use resolver::PortfolioResolver;
