//! Query-string parameters
//!
//! Numeric fields arrive as raw strings so that malformed paging values fall
//! back to defaults instead of rejecting the request. Ids are stricter: a bad
//! id is a 400.

use std::collections::BTreeSet;

use serde::Deserialize;

use venturectl_core::{OrderRule, PageWindow, SearchKeyword, ValidationError, MAX_COMPARISONS};

/// Most ids accepted in one `compareIds` list
pub const MAX_COMPARE_IDS: usize = 100;

/// Default neighbours on each side of the rank view
pub const DEFAULT_RANK_K: usize = 2;

/// Widest rank neighbourhood a client may ask for
pub const MAX_RANK_K: usize = 5;

/// `?offset&limit&order` shared by every listing
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    pub fn window(&self) -> PageWindow {
        PageWindow::parse(self.offset.as_deref(), self.limit.as_deref())
    }

    pub fn order_or(&self, default: &str) -> OrderRule {
        OrderRule::resolve_or(self.order.as_deref(), default)
    }
}

/// `GET /api/startups/search`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_keyword: Option<String>,
    #[serde(flatten)]
    pub list: ListParams,
}

impl SearchParams {
    pub fn keyword(&self) -> Result<SearchKeyword, ValidationError> {
        SearchKeyword::new(self.search_keyword.as_deref().unwrap_or_default())
    }
}

/// `GET /api/startups/comparison`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonParams {
    pub startup_id: Option<String>,
    pub compare_ids: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
}

impl ComparisonParams {
    pub fn startup_id(&self) -> Result<i64, ValidationError> {
        match self.startup_id.as_deref().map(str::trim) {
            None | Some("") => Err(ValidationError::Empty { field: "startupId" }),
            Some(raw) => parse_id("startupId", raw),
        }
    }

    /// Distinct ids from the comma-separated list. Empty segments are skipped.
    pub fn compare_ids(&self) -> Result<BTreeSet<i64>, ValidationError> {
        let Some(raw) = self.compare_ids.as_deref() else {
            return Ok(BTreeSet::new());
        };

        let mut ids = BTreeSet::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            ids.insert(parse_id("compareIds", part)?);
            if ids.len() > MAX_COMPARE_IDS {
                return Err(ValidationError::TooMany {
                    field: "compareIds",
                    max: MAX_COMPARE_IDS,
                });
            }
        }
        Ok(ids)
    }

    /// Requested peer count, defaulting to and capped at `MAX_COMPARISONS`.
    pub fn limit(&self) -> usize {
        PageWindow::parse(None, self.limit.as_deref())
            .clamp_limit(MAX_COMPARISONS as i64)
            .limit() as usize
    }

    pub fn order(&self) -> OrderRule {
        OrderRule::resolve_or(self.order.as_deref(), "simInvestDesc")
    }
}

/// `GET /api/startups/{id}/rank`
#[derive(Debug, Default, Deserialize)]
pub struct RankParams {
    pub order: Option<String>,
    pub k: Option<String>,
}

impl RankParams {
    pub fn order(&self) -> OrderRule {
        OrderRule::resolve_or(self.order.as_deref(), "simInvestDesc")
    }

    pub fn k(&self) -> usize {
        self.k
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_RANK_K)
            .clamp(1, MAX_RANK_K)
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ValidationError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(startup_id: Option<&str>, compare_ids: Option<&str>) -> ComparisonParams {
        ComparisonParams {
            startup_id: startup_id.map(String::from),
            compare_ids: compare_ids.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn startup_id_is_required() {
        assert_eq!(
            comparison(None, None).startup_id(),
            Err(ValidationError::Empty { field: "startupId" })
        );
        assert!(comparison(Some("abc"), None).startup_id().is_err());
        assert!(comparison(Some("-3"), None).startup_id().is_err());
        assert_eq!(comparison(Some(" 7 "), None).startup_id(), Ok(7));
    }

    #[test]
    fn compare_ids_dedup_and_reject_garbage() {
        let ids = comparison(Some("1"), Some("3,2,,3, 4")).compare_ids().unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);

        assert!(matches!(
            comparison(Some("1"), Some("2,x")).compare_ids(),
            Err(ValidationError::InvalidValue { field: "compareIds", .. })
        ));
        assert!(comparison(Some("1"), None).compare_ids().unwrap().is_empty());
    }

    #[test]
    fn compare_ids_are_bounded() {
        let raw = (1..=(MAX_COMPARE_IDS as i64 + 1))
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        assert!(matches!(
            comparison(Some("1"), Some(&raw)).compare_ids(),
            Err(ValidationError::TooMany { .. })
        ));
    }

    #[test]
    fn comparison_limit_defaults_and_clamps_to_five() {
        let mut params = comparison(Some("1"), None);
        assert_eq!(params.limit(), 5);
        params.limit = Some("3".into());
        assert_eq!(params.limit(), 3);
        params.limit = Some("50".into());
        assert_eq!(params.limit(), 5);
        params.limit = Some("0".into());
        assert_eq!(params.limit(), 5);
    }

    #[test]
    fn rank_k_is_clamped() {
        let mut params = RankParams::default();
        assert_eq!(params.k(), 2);
        params.k = Some("0".into());
        assert_eq!(params.k(), 1);
        params.k = Some("99".into());
        assert_eq!(params.k(), 5);
        params.k = Some("nope".into());
        assert_eq!(params.k(), 2);
    }

    #[test]
    fn blank_search_keyword_is_rejected() {
        let params = SearchParams {
            search_keyword: Some("   ".into()),
            ..Default::default()
        };
        assert!(params.keyword().is_err());
        assert!(SearchParams::default().keyword().is_err());
    }
}
