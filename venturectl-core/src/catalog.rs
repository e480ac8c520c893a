//! Catalog: ordering, pagination and comparison wired to a startup store

use std::collections::BTreeSet;

use crate::compare::{adjacent_window, rank_view, select_peers, Comparison, RankView};
use crate::error::RepositoryError;
use crate::models::Startup;
use crate::order::OrderRule;
use crate::pagination::{paginate, Page, PageWindow};
use crate::repo::{Deadline, StartupFilter, StartupQuery, StartupRepository};

/// Read-side operations over the startup collection.
///
/// Borrows an injected repository for the duration of one request and keeps
/// no state of its own.
pub struct Catalog<'a> {
    repo: &'a dyn StartupRepository,
    deadline: Deadline,
}

impl<'a> Catalog<'a> {
    pub fn new(repo: &'a dyn StartupRepository) -> Self {
        Self {
            repo,
            deadline: Deadline::NONE,
        }
    }

    /// Deadline handed to every store call made through this catalog.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// One page of startups plus count metadata.
    pub async fn list(
        &self,
        filter: StartupFilter,
        order: OrderRule,
        window: PageWindow,
    ) -> Result<Page<Startup>, RepositoryError> {
        let query = StartupQuery {
            filter,
            order,
            deadline: self.deadline,
        };
        paginate(
            window,
            |skip, take| self.repo.fetch(&query, skip, take),
            || self.repo.count(&query),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> Result<Startup, RepositoryError> {
        self.repo
            .get(id, self.deadline)
            .await?
            .ok_or_else(|| RepositoryError::not_found("startup", id))
    }

    /// Compare a focal startup against the named candidates.
    ///
    /// Fails with `NotFound` if the focal startup is absent. The store is not
    /// queried for candidates when none remain after removing the focal id.
    pub async fn compare(
        &self,
        focal_id: i64,
        candidate_ids: &BTreeSet<i64>,
        order: OrderRule,
        requested_limit: usize,
    ) -> Result<Comparison, RepositoryError> {
        let startup = self.get(focal_id).await?;

        let ids: Vec<i64> = candidate_ids
            .iter()
            .copied()
            .filter(|id| *id != focal_id)
            .collect();
        if ids.is_empty() {
            return Ok(Comparison {
                startup,
                comparisons: Vec::new(),
            });
        }

        let candidates = self.repo.find_many(&ids, order, self.deadline).await?;
        let comparisons = select_peers(focal_id, candidate_ids, candidates, order, requested_limit);
        tracing::debug!(
            focal_id,
            requested = ids.len(),
            returned = comparisons.len(),
            order = order.keyword(),
            "comparison selected"
        );

        Ok(Comparison {
            startup,
            comparisons,
        })
    }

    /// The `k` startups ranked immediately above and below `focal_id`.
    ///
    /// Only the window's rows are read; the focal position comes from the
    /// store's own ranking.
    pub async fn rank(
        &self,
        focal_id: i64,
        order: OrderRule,
        k: usize,
    ) -> Result<RankView, RepositoryError> {
        let position = self
            .repo
            .rank_of(focal_id, order, self.deadline)
            .await?
            .ok_or_else(|| RepositoryError::not_found("startup", focal_id))?;

        let window = adjacent_window(position.total, position.index, k);
        let query = StartupQuery {
            filter: StartupFilter::All,
            order,
            deadline: self.deadline,
        };
        let items = self
            .repo
            .fetch(&query, window.start as i64, window.len() as i64)
            .await?;

        Ok(rank_view(focal_id, position, window, items))
    }

    /// Record that a startup was picked, returning its updated state.
    pub async fn select(&self, id: i64) -> Result<Startup, RepositoryError> {
        self.repo
            .record_selection(id, self.deadline)
            .await?
            .ok_or_else(|| RepositoryError::not_found("startup", id))
    }
}
