//! Offset/limit pagination
//!
//! Windows are parsed from untrusted query strings and normalized before they
//! reach a store: garbage or negative offsets become 0, garbage, zero or
//! negative limits become 10, and limits are clamped to a ceiling.

use std::future::Future;

use serde::Serialize;

use crate::error::RepositoryError;

/// Offset used when none (or an invalid one) is supplied
pub const DEFAULT_OFFSET: i64 = 0;

/// Limit used when none (or an invalid one) is supplied
pub const DEFAULT_LIMIT: i64 = 10;

/// Ceiling for listing endpoints
pub const MAX_LIMIT: i64 = 100;

/// Normalized offset/limit pair; limit is always ≥ 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    offset: i64,
    limit: i64,
}

impl PageWindow {
    /// Build a window from numeric input, normalizing out-of-range values.
    pub fn new(offset: i64, limit: i64) -> Self {
        let offset = if offset < 0 { DEFAULT_OFFSET } else { offset };
        let limit = if limit <= 0 { DEFAULT_LIMIT } else { limit };
        Self {
            offset,
            limit: limit.min(MAX_LIMIT),
        }
    }

    /// Parse raw query-string values.
    ///
    /// # Example
    /// ```
    /// use venturectl_core::PageWindow;
    ///
    /// let w = PageWindow::parse(Some("-5"), Some("abc"));
    /// assert_eq!((w.offset(), w.limit()), (0, 10));
    ///
    /// let w = PageWindow::parse(Some("20"), Some("500"));
    /// assert_eq!((w.offset(), w.limit()), (20, 100));
    /// ```
    pub fn parse(raw_offset: Option<&str>, raw_limit: Option<&str>) -> Self {
        Self::new(
            parse_non_negative(raw_offset).unwrap_or(DEFAULT_OFFSET),
            parse_non_negative(raw_limit).unwrap_or(DEFAULT_LIMIT),
        )
    }

    /// Tighten the limit ceiling (e.g. the comparison endpoint's 5).
    pub fn clamp_limit(self, max: i64) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.min(max.max(1)),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_non_negative(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok().filter(|v| *v >= 0)
}

/// Pagination envelope returned by every listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Assemble an envelope from a fetched window and a total count.
    pub fn assemble(mut items: Vec<T>, total_count: i64, window: PageWindow) -> Self {
        let total_count = total_count.max(0);
        items.truncate(window.limit() as usize);
        Self {
            items,
            total_count,
            total_pages: total_pages(total_count, window.limit()),
            has_next_page: has_next_page(total_count, window),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
        }
    }
}

/// `ceil(total / limit)`, and 0 for an empty collection.
pub fn total_pages(total_count: i64, limit: i64) -> i64 {
    if total_count <= 0 || limit <= 0 {
        0
    } else {
        (total_count + limit - 1) / limit
    }
}

pub fn has_next_page(total_count: i64, window: PageWindow) -> bool {
    window.offset().saturating_add(window.limit()) < total_count
}

/// Run one windowed fetch and one count, then assemble the envelope.
///
/// Both calls are issued concurrently and are not isolated from each other:
/// under concurrent writes `totalCount` may disagree with the page by a few
/// rows. Either call failing fails the whole page.
pub async fn paginate<T, F, FFut, C, CFut>(
    window: PageWindow,
    fetch: F,
    count: C,
) -> Result<Page<T>, RepositoryError>
where
    F: FnOnce(i64, i64) -> FFut,
    FFut: Future<Output = Result<Vec<T>, RepositoryError>>,
    C: FnOnce() -> CFut,
    CFut: Future<Output = Result<i64, RepositoryError>>,
{
    tracing::debug!(
        offset = window.offset(),
        limit = window.limit(),
        "paginating"
    );
    let (items, total) = futures::try_join!(fetch(window.offset(), window.limit()), count())?;
    Ok(Page::assemble(items, total, window))
}
