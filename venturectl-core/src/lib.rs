//! venturectl-core: the catalog logic behind the startup browsing API
//!
//! Everything here is a stateless transformer over values handed in by the
//! caller. Storage is reached only through the traits in [`repo`], so the HTTP
//! layer can inject a Postgres handle and tests can inject an in-memory one.
//!
//! - [`order`]: sort keyword → [`OrderRule`]
//! - [`pagination`]: offset/limit windows and the [`Page`] envelope
//! - [`compare`]: peer selection and adjacent-rank windows
//! - [`catalog`]: the above wired to a [`StartupRepository`]

pub mod catalog;
pub mod compare;
pub mod error;
pub mod models;
pub mod order;
pub mod pagination;
pub mod repo;

pub use catalog::Catalog;
pub use compare::{Comparison, RankPosition, RankView, RankedEntry, MAX_COMPARISONS};
pub use error::RepositoryError;
pub use models::{
    Amount, Category, Investment, InvestmentPatch, NewInvestment, SearchKeyword, Startup,
    ValidationError,
};
pub use order::{Direction, OrderField, OrderRule};
pub use pagination::{paginate, Page, PageWindow};
pub use repo::{
    Deadline, DeleteOutcome, InvestmentRepository, StartupFilter, StartupQuery,
    StartupRepository, UpdateOutcome,
};
