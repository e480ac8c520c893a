//! Peer selection for the comparison and rank views
//!
//! Both views rank startups by an [`OrderRule`]. The comparison view picks a
//! bounded set of peers the client named, never including the focal startup.
//! The rank view numbers a window of the global ranking around the focal
//! startup; the store supplies the focal position and the window's rows.

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use serde::Serialize;

use crate::models::Startup;
use crate::order::OrderRule;

/// Hard ceiling on peers returned by the comparison view
pub const MAX_COMPARISONS: usize = 5;

/// A focal startup and the peers it is compared against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub startup: Startup,
    pub comparisons: Vec<Startup>,
}

/// Startup annotated with its 1-based position in a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry<T> {
    pub rank: usize,
    pub is_focal: bool,
    #[serde(flatten)]
    pub item: T,
}

/// Neighbourhood of a focal startup within a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankView {
    pub rank: usize,
    pub total_count: usize,
    pub items: Vec<RankedEntry<Startup>>,
}

/// Choose up to `min(requested_limit, MAX_COMPARISONS)` peers.
///
/// Candidates outside `candidate_ids`, duplicates, and the focal startup itself
/// are dropped whatever the store returned. An empty result is not an error.
pub fn select_peers(
    focal_id: i64,
    candidate_ids: &BTreeSet<i64>,
    candidates: Vec<Startup>,
    order: OrderRule,
    requested_limit: usize,
) -> Vec<Startup> {
    let limit = requested_limit.min(MAX_COMPARISONS);
    let mut seen = HashSet::new();
    let mut peers: Vec<Startup> = candidates
        .into_iter()
        .filter(|s| s.id != focal_id && candidate_ids.contains(&s.id))
        .filter(|s| seen.insert(s.id))
        .collect();

    order.sort(&mut peers);
    peers.truncate(limit);
    peers
}

/// Index range of the `2k+1` entries centred on `index`.
///
/// Near either end the window slides inward rather than shrinking, so a
/// focal entry at the top still sees `2k` neighbours below it. It only
/// shrinks when `len < 2k+1`.
///
/// # Example
/// ```
/// use venturectl_core::compare::adjacent_window;
///
/// assert_eq!(adjacent_window(10, 4, 2), 2..7);
/// assert_eq!(adjacent_window(10, 0, 2), 0..5);
/// assert_eq!(adjacent_window(10, 9, 2), 5..10);
/// ```
pub fn adjacent_window(len: usize, index: usize, k: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let width = k.saturating_mul(2).saturating_add(1).min(len);
    let start = index.saturating_sub(k).min(len - width);
    start..start + width
}

/// Zero-based position of one startup within a full ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankPosition {
    pub index: usize,
    pub total: usize,
}

/// Annotate the rows fetched for `window` with their ranks.
///
/// `items` is the slice of the ranking starting at `window.start`. The focal
/// flag follows the id, so a row that moved between the two reads is never
/// mislabelled.
pub fn rank_view(
    focal_id: i64,
    position: RankPosition,
    window: Range<usize>,
    items: Vec<Startup>,
) -> RankView {
    let items = items
        .into_iter()
        .take(window.len())
        .enumerate()
        .map(|(offset, item)| RankedEntry {
            rank: window.start + offset + 1,
            is_focal: item.id == focal_id,
            item,
        })
        .collect();

    RankView {
        rank: position.index + 1,
        total_count: position.total,
        items,
    }
}
