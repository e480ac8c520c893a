//! Sort keyword resolution
//!
//! Listing endpoints accept an `order` keyword from the query string. The set
//! of keywords is closed; anything unrecognized resolves to id ascending
//! instead of failing the request, and the fallback is logged at debug level.
//! Every rule other than plain id ordering breaks ties by id ascending, so
//! each rule is a total order and offset pagination is stable.

use std::cmp::Ordering;

use crate::models::Startup;

/// Column a rule sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Id,
    Count,
    SimInvest,
    ActualInvest,
    Revenue,
    Employees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// A resolved (field, direction) sort instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderRule {
    pub field: OrderField,
    pub direction: Direction,
}

/// Recognized keywords, one rule each
const KEYWORDS: &[(&str, OrderRule)] = &[
    ("id", OrderRule::new(OrderField::Id, Direction::Asc)),
    ("countDesc", OrderRule::new(OrderField::Count, Direction::Desc)),
    ("countAsc", OrderRule::new(OrderField::Count, Direction::Asc)),
    ("simInvestDesc", OrderRule::new(OrderField::SimInvest, Direction::Desc)),
    ("simInvestAsc", OrderRule::new(OrderField::SimInvest, Direction::Asc)),
    ("actualInvestDesc", OrderRule::new(OrderField::ActualInvest, Direction::Desc)),
    ("actualInvestAsc", OrderRule::new(OrderField::ActualInvest, Direction::Asc)),
    ("revenueDesc", OrderRule::new(OrderField::Revenue, Direction::Desc)),
    ("revenueAsc", OrderRule::new(OrderField::Revenue, Direction::Asc)),
    ("employeeDesc", OrderRule::new(OrderField::Employees, Direction::Desc)),
    ("employeeAsc", OrderRule::new(OrderField::Employees, Direction::Asc)),
];

impl OrderRule {
    /// Id ascending; also the fallback for unknown keywords.
    pub const DEFAULT: OrderRule = OrderRule::new(OrderField::Id, Direction::Asc);

    pub const fn new(field: OrderField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Resolve a sort keyword. Never fails.
    ///
    /// # Example
    /// ```
    /// use venturectl_core::{Direction, OrderField, OrderRule};
    ///
    /// let rule = OrderRule::resolve("countDesc");
    /// assert_eq!(rule.field, OrderField::Count);
    /// assert_eq!(rule.direction, Direction::Desc);
    /// assert_eq!(OrderRule::resolve("bogus"), OrderRule::resolve("id"));
    /// ```
    pub fn resolve(keyword: &str) -> Self {
        match KEYWORDS.iter().find(|(k, _)| *k == keyword) {
            Some((_, rule)) => *rule,
            None => {
                tracing::debug!(keyword, "unrecognized order keyword, using id ascending");
                Self::DEFAULT
            }
        }
    }

    /// Resolve an optional keyword, using the endpoint's default when absent.
    pub fn resolve_or(keyword: Option<&str>, default: &str) -> Self {
        Self::resolve(keyword.unwrap_or(default))
    }

    /// Keyword that resolves to this rule.
    pub fn keyword(&self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, rule)| rule == self)
            .map(|(k, _)| *k)
            .unwrap_or("id")
    }

    /// Total order over startups matching the SQL rendering of this rule.
    pub fn compare(&self, a: &Startup, b: &Startup) -> Ordering {
        let primary = match self.field {
            OrderField::Id => a.id.cmp(&b.id),
            OrderField::Count => a.count.cmp(&b.count),
            OrderField::SimInvest => a.sim_invest.cmp(&b.sim_invest),
            OrderField::ActualInvest => a.actual_invest.cmp(&b.actual_invest),
            OrderField::Revenue => a.revenue.cmp(&b.revenue),
            OrderField::Employees => a.employees.cmp(&b.employees),
        };
        let primary = match self.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, startups: &mut [Startup]) {
        startups.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for OrderRule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;

    fn startup(id: i64, count: i64, sim: u64) -> Startup {
        Startup {
            id,
            name: format!("s{}", id),
            description: String::new(),
            image: None,
            category: None,
            actual_invest: Amount::zero(),
            sim_invest: Amount::from(sim),
            revenue: Amount::zero(),
            employees: 0,
            count,
        }
    }

    #[test]
    fn resolves_required_keywords() {
        assert_eq!(OrderRule::resolve("id"), OrderRule::DEFAULT);
        assert_eq!(
            OrderRule::resolve("countDesc"),
            OrderRule::new(OrderField::Count, Direction::Desc)
        );
        assert_eq!(
            OrderRule::resolve("simInvestDesc"),
            OrderRule::new(OrderField::SimInvest, Direction::Desc)
        );
    }

    #[test]
    fn unknown_keyword_matches_id() {
        for bogus in ["", "ID", "countdesc", "name; DROP TABLE startups"] {
            assert_eq!(OrderRule::resolve(bogus), OrderRule::resolve("id"));
        }
    }

    #[test]
    fn resolve_or_uses_endpoint_default() {
        assert_eq!(
            OrderRule::resolve_or(None, "countDesc"),
            OrderRule::resolve("countDesc")
        );
        assert_eq!(
            OrderRule::resolve_or(Some("id"), "countDesc"),
            OrderRule::DEFAULT
        );
    }

    #[test]
    fn keyword_round_trips() {
        for (keyword, rule) in KEYWORDS {
            assert_eq!(rule.keyword(), *keyword);
            assert_eq!(OrderRule::resolve(keyword), *rule);
        }
    }

    #[test]
    fn descending_breaks_ties_by_id_ascending() {
        let mut items = vec![startup(3, 5, 0), startup(1, 5, 0), startup(2, 9, 0)];
        OrderRule::resolve("countDesc").sort(&mut items);
        let ids: Vec<i64> = items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn sim_invest_compares_numerically() {
        let mut items = vec![startup(1, 0, 9), startup(2, 0, 10), startup(3, 0, 100)];
        OrderRule::resolve("simInvestDesc").sort(&mut items);
        let ids: Vec<i64> = items.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
