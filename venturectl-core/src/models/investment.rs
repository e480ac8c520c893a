//! Mock investment records and their write payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::{bounded_text, required_text};
use super::{Amount, ValidationError};

const MAX_NAME_LEN: usize = 50;
const MAX_COMMENT_LEN: usize = 500;
const MAX_PASSWORD_LEN: usize = 128;

/// A mock investment as returned to clients.
///
/// The delete password stays inside the store and is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub startup_id: i64,
    pub name: String,
    pub invest_amount: Amount,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating an investment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvestment {
    pub startup_id: i64,
    pub name: String,
    pub invest_amount: Amount,
    pub comment: String,
    pub password: String,
}

impl NewInvestment {
    pub fn new(
        startup_id: i64,
        name: &str,
        invest_amount: Amount,
        comment: &str,
        password: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            startup_id: startup_id_field(startup_id)?,
            name: required_text("name", name, MAX_NAME_LEN)?,
            invest_amount,
            comment: bounded_text("comment", comment, MAX_COMMENT_LEN)?,
            password: password_field(password)?,
        })
    }
}

/// Validated partial update; at least one field is present
///
/// A new `password` is only accepted together with `current_password`, which
/// the store checks against the stored one before writing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestmentPatch {
    pub startup_id: Option<i64>,
    pub name: Option<String>,
    pub invest_amount: Option<Amount>,
    pub comment: Option<String>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}

impl InvestmentPatch {
    pub fn new(
        startup_id: Option<i64>,
        name: Option<&str>,
        invest_amount: Option<Amount>,
        comment: Option<&str>,
        password: Option<&str>,
        current_password: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if password.is_some() && current_password.is_none() {
            return Err(ValidationError::Empty {
                field: "currentPassword",
            });
        }

        let patch = Self {
            startup_id: startup_id.map(startup_id_field).transpose()?,
            name: name
                .map(|n| required_text("name", n, MAX_NAME_LEN))
                .transpose()?,
            invest_amount,
            comment: comment
                .map(|c| bounded_text("comment", c, MAX_COMMENT_LEN))
                .transpose()?,
            password: password.map(password_field).transpose()?,
            current_password: current_password.map(str::to_string),
        };

        if patch.is_empty() {
            return Err(ValidationError::Empty { field: "patch" });
        }
        Ok(patch)
    }

    /// No field would change. `current_password` alone changes nothing.
    pub fn is_empty(&self) -> bool {
        self.startup_id.is_none()
            && self.name.is_none()
            && self.invest_amount.is_none()
            && self.comment.is_none()
            && self.password.is_none()
    }

    /// Apply the present fields onto an existing record.
    pub fn apply_to(&self, investment: &mut Investment) {
        if let Some(startup_id) = self.startup_id {
            investment.startup_id = startup_id;
        }
        if let Some(name) = &self.name {
            investment.name = name.clone();
        }
        if let Some(amount) = &self.invest_amount {
            investment.invest_amount = amount.clone();
        }
        if let Some(comment) = &self.comment {
            investment.comment = comment.clone();
        }
    }
}

fn startup_id_field(id: i64) -> Result<i64, ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidValue {
            field: "startupId",
            value: id.to_string(),
        });
    }
    Ok(id)
}

// Passwords are opaque: no trimming.
fn password_field(password: &str) -> Result<String, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    bounded_text("password", password, MAX_PASSWORD_LEN)
}
