//! Startup and category records

use serde::Serialize;

use super::Amount;

/// Category label a startup is filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A company available for browsing, selection and mock investment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Startup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub category: Option<Category>,
    /// Real investment raised to date
    pub actual_invest: Amount,
    /// Sum of mock investments recorded on the platform
    pub sim_invest: Amount,
    pub revenue: Amount,
    pub employees: i32,
    /// Times this startup has been picked for comparison
    pub count: i64,
}
