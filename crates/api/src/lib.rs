//! ShopSEO API server library.
//!
//! Exposes the building blocks (config, state, services, error handling,
//! routes) so integration tests and the binary entrypoint share them.

pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod handlers;
pub mod preferences;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
