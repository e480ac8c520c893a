//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an explicit size limit
//! - Listings join categories in the same statement - no N+1 queries
//! - Every write is a single statement - no check-then-write
//! - Sort columns come from a fixed table, never from request text

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
