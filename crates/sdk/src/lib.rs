//! Vitrine SDK
//!
//! Wire types for the portfolio query API. The kernel serializes these
//! types in its REST responses and the client deserializes them, so both
//! sides agree on field names without duplicating definitions.

pub mod params;
pub mod types;

pub mod prelude {
    pub use crate::params::*;
    pub use crate::types::*;
}
