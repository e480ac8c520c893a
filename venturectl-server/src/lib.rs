//! venturectl-server: HTTP API over the startup catalog
//!
//! Exposes listing, search, comparison and rank views of startups plus CRUD
//! for mock investments, backed by Postgres.

pub mod db;
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use http::{router, run_server, AppState, ServerConfig, ServerError};
