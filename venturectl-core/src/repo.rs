//! Store contracts
//!
//! The catalog and the HTTP layer reach persistent state only through these
//! traits. Implementations own all entity state; callers hold nothing between
//! requests.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::compare::RankPosition;
use crate::error::RepositoryError;
use crate::models::{Investment, InvestmentPatch, NewInvestment, SearchKeyword, Startup};
use crate::order::OrderRule;

/// Optional point in time after which a store call should give up.
///
/// The catalog never inspects it; it is carried from the caller to the store
/// unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub const NONE: Deadline = Deadline(None);

    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// `timeout` from now, or no deadline at all.
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }
}

/// Which startups a listing covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StartupFilter {
    #[default]
    All,
    /// Case-insensitive substring match on name
    NameContains(SearchKeyword),
}

impl StartupFilter {
    pub fn matches(&self, startup: &Startup) -> bool {
        match self {
            Self::All => true,
            Self::NameContains(keyword) => keyword.matches(&startup.name),
        }
    }
}

/// Filter + order shared by the fetch and count halves of a listing
#[derive(Debug, Clone, Default)]
pub struct StartupQuery {
    pub filter: StartupFilter,
    pub order: OrderRule,
    pub deadline: Deadline,
}

#[async_trait]
pub trait StartupRepository: Send + Sync {
    /// Filtered, ordered window of startups with their category.
    async fn fetch(
        &self,
        query: &StartupQuery,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Startup>, RepositoryError>;

    /// Number of startups matching the query's filter.
    async fn count(&self, query: &StartupQuery) -> Result<i64, RepositoryError>;

    async fn get(&self, id: i64, deadline: Deadline) -> Result<Option<Startup>, RepositoryError>;

    /// Startups whose id is in `ids`, ordered by `order`. Unknown ids are skipped.
    async fn find_many(
        &self,
        ids: &[i64],
        order: OrderRule,
        deadline: Deadline,
    ) -> Result<Vec<Startup>, RepositoryError>;

    /// Where `id` sits in the whole collection ordered by `order`; `None` if
    /// the startup is absent.
    async fn rank_of(
        &self,
        id: i64,
        order: OrderRule,
        deadline: Deadline,
    ) -> Result<Option<RankPosition>, RepositoryError>;

    /// Bump the selection counter by one; `None` if the startup is absent.
    async fn record_selection(
        &self,
        id: i64,
        deadline: Deadline,
    ) -> Result<Option<Startup>, RepositoryError>;
}

/// Result of a password-checked delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// No investment with that id; nothing was touched
    NotFound,
    /// Investment exists but the password did not match; nothing was touched
    PasswordMismatch,
}

/// Result of a patch that may carry a password change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Investment),
    /// No investment with that id; nothing was touched
    NotFound,
    /// A password change was requested with the wrong current password;
    /// nothing was touched
    PasswordMismatch,
}

#[async_trait]
pub trait InvestmentRepository: Send + Sync {
    async fn get(&self, id: i64, deadline: Deadline)
        -> Result<Option<Investment>, RepositoryError>;

    /// Insert a record and add its amount to the startup's `sim_invest`.
    /// A missing startup is `RepositoryError::NotFound`.
    async fn create(
        &self,
        new: &NewInvestment,
        deadline: Deadline,
    ) -> Result<Investment, RepositoryError>;

    /// Apply a patch by investment id, moving the amount between startup
    /// totals as needed.
    async fn update(
        &self,
        id: i64,
        patch: &InvestmentPatch,
        deadline: Deadline,
    ) -> Result<UpdateOutcome, RepositoryError>;

    /// Delete by id only when `password` matches the stored one, taking the
    /// amount back off the startup's `sim_invest`.
    async fn delete(
        &self,
        id: i64,
        password: &str,
        deadline: Deadline,
    ) -> Result<DeleteOutcome, RepositoryError>;
}
