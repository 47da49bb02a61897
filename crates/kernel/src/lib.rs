//! Vitrine Kernel Library
//!
//! Portfolio query resolver, filter catalog and content repositories.
//! The main entry point for running the server is the `vitrine` binary.

pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod portfolio;
pub mod repository;
pub mod routes;
pub mod state;
pub mod tap;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
