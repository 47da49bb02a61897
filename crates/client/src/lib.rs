//! Vitrine Client
//!
//! Filter and pagination controller for the portfolio API. State changes go
//! through a reducer ([`ControllerState::dispatch`]) that returns the fetches
//! to run. [`PortfolioController`] runs them against a [`PortfolioApi`] and
//! [`render`](render::render) turns the state into HTML.

pub mod action;
pub mod driver;
pub mod error;
pub mod pager;
pub mod reducer;
pub mod render;
pub mod request;
pub mod state;
pub mod transport;

pub use action::{Action, Effect};
pub use driver::PortfolioController;
pub use error::ClientError;
pub use request::QueryRequest;
pub use state::{ControllerConfig, ControllerState, FilterKind, PaginationStrategy, Phase};
pub use transport::{HttpPortfolioApi, PortfolioApi};

pub mod prelude {
    pub use crate::action::{Action, Effect};
    pub use crate::driver::PortfolioController;
    pub use crate::error::ClientError;
    pub use crate::state::*;
    pub use crate::transport::{HttpPortfolioApi, PortfolioApi};
    pub use vitrine_sdk::types::{SortKey, SortOrder};
}
