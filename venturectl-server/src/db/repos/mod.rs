//! Postgres implementations of the catalog repositories
//!
//! Each repository follows these patterns:
//! - Listings JOIN categories in the same statement (no N+1)
//! - Writes are single statements; foreign-key failures become NotFound
//! - Caller deadlines are enforced with `tokio::time::timeout_at`

pub mod investments;
pub mod startups;

use std::future::Future;

use venturectl_core::{Deadline, RepositoryError};

pub use investments::PgInvestmentRepo;
pub use startups::PgStartupRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("query deadline exceeded")]
    Timeout,
}

impl From<DbError> for RepositoryError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Timeout => RepositoryError::DeadlineExceeded,
            other => RepositoryError::backend(other),
        }
    }
}

/// Run a query future, giving up once the caller's deadline passes.
pub(crate) async fn within<T, F>(deadline: Deadline, query: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, DbError>>,
{
    let result = match deadline.instant() {
        Some(at) => match tokio::time::timeout_at(at.into(), query).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout),
        },
        None => query.await,
    };
    result.map_err(RepositoryError::from)
}

/// Whether a write failed on a foreign-key constraint.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}
