//! Domain models with validation at construction
//!
//! Request input is checked when these types are built. Invalid input returns
//! ValidationError, never a panic.

pub mod amount;
pub mod investment;
pub mod search;
pub mod startup;
pub mod validation;

pub use amount::Amount;
pub use investment::{Investment, InvestmentPatch, NewInvestment};
pub use search::SearchKeyword;
pub use startup::{Category, Startup};
pub use validation::ValidationError;
