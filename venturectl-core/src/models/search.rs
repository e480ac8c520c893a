//! Search keyword validation

use super::validation::required_text;
use super::ValidationError;

/// Maximum length for a search keyword
const MAX_KEYWORD_LEN: usize = 100;

/// Non-blank, trimmed name search keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeyword {
    raw: String,
    folded: String,
}

impl SearchKeyword {
    /// Validate a keyword taken from the query string.
    ///
    /// Blank input is an error so that no store query is issued for it.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let raw = required_text("searchKeyword", s, MAX_KEYWORD_LEN)?;
        let folded = raw.to_lowercase();
        Ok(Self { raw, folded })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring match against a name.
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.folded)
    }
}
