//! Repository error type shared by every store implementation

use thiserror::Error;

/// Failure reported by a repository (or by the catalog on its behalf)
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed record does not exist
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// The caller-supplied deadline passed before the store answered
    #[error("query deadline exceeded")]
    DeadlineExceeded,

    /// Any other store failure
    #[error("store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}
