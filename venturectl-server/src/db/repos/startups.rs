//! Startup repository
//!
//! - fetch/count: same WHERE clause, two statements (count may drift under
//!   concurrent writes)
//! - find_many: ordered server-side with the same ORDER BY as listings
//! - rank_of: ROW_NUMBER over that ORDER BY; the rank window is then read
//!   through fetch, so only the neighbourhood leaves the database
//! - record_selection: CTE update + JOIN in one statement

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use venturectl_core::{
    Amount, Category, Deadline, Direction, OrderField, OrderRule, RankPosition, RepositoryError,
    Startup, StartupFilter, StartupQuery, StartupRepository,
};

use super::{within, DbError};

/// Columns every startup query selects, aliased `s` / `c`
const STARTUP_COLUMNS: &str = r#"
    s.id, s.name, s.description, s.image,
    s.actual_invest, s.sim_invest, s.revenue, s.employees, s.count,
    c.id AS category_id, c.name AS category_name
"#;

/// Render an order rule as a fixed ORDER BY body.
///
/// Ties always fall back to `s.id ASC`, matching `OrderRule::compare`.
pub fn order_clause(rule: OrderRule) -> &'static str {
    use Direction::{Asc, Desc};
    use OrderField::*;

    match (rule.field, rule.direction) {
        (Id, Asc) => "s.id ASC",
        (Id, Desc) => "s.id DESC",
        (Count, Asc) => "s.count ASC, s.id ASC",
        (Count, Desc) => "s.count DESC, s.id ASC",
        (SimInvest, Asc) => "s.sim_invest ASC, s.id ASC",
        (SimInvest, Desc) => "s.sim_invest DESC, s.id ASC",
        (ActualInvest, Asc) => "s.actual_invest ASC, s.id ASC",
        (ActualInvest, Desc) => "s.actual_invest DESC, s.id ASC",
        (Revenue, Asc) => "s.revenue ASC, s.id ASC",
        (Revenue, Desc) => "s.revenue DESC, s.id ASC",
        (Employees, Asc) => "s.employees ASC, s.id ASC",
        (Employees, Desc) => "s.employees DESC, s.id ASC",
    }
}

/// ILIKE pattern for a name filter, or NULL for "all".
///
/// `%`, `_` and `\` in the keyword match literally.
pub fn name_pattern(filter: &StartupFilter) -> Option<String> {
    match filter {
        StartupFilter::All => None,
        StartupFilter::NameContains(keyword) => {
            let mut pattern = String::with_capacity(keyword.as_str().len() + 2);
            pattern.push('%');
            for ch in keyword.as_str().chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            Some(pattern)
        }
    }
}

fn startup_from_row(row: &PgRow) -> Result<Startup, sqlx::Error> {
    let category_id: Option<i64> = row.try_get("category_id")?;
    let category_name: Option<String> = row.try_get("category_name")?;
    let category = match (category_id, category_name) {
        (Some(id), Some(name)) => Some(Category { id, name }),
        _ => None,
    };

    Ok(Startup {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        category,
        actual_invest: Amount::from(row.try_get::<BigDecimal, _>("actual_invest")?),
        sim_invest: Amount::from(row.try_get::<BigDecimal, _>("sim_invest")?),
        revenue: Amount::from(row.try_get::<BigDecimal, _>("revenue")?),
        employees: row.try_get("employees")?,
        count: row.try_get("count")?,
    })
}

fn startups_from_rows(rows: Vec<PgRow>) -> Result<Vec<Startup>, DbError> {
    rows.iter()
        .map(|row| startup_from_row(row).map_err(DbError::from))
        .collect()
}

/// Startup repository backed by Postgres
#[derive(Clone)]
pub struct PgStartupRepo {
    pool: PgPool,
}

impl PgStartupRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StartupRepository for PgStartupRepo {
    async fn fetch(
        &self,
        query: &StartupQuery,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Startup>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {STARTUP_COLUMNS}
            FROM startups s
            LEFT JOIN categories c ON c.id = s.category_id
            WHERE ($1::text IS NULL OR s.name ILIKE $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            order_clause(query.order)
        );
        let pattern = name_pattern(&query.filter);

        within(query.deadline, async {
            let rows = sqlx::query(&sql)
                .bind(pattern.as_deref())
                .bind(take)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?;
            startups_from_rows(rows)
        })
        .await
    }

    async fn count(&self, query: &StartupQuery) -> Result<i64, RepositoryError> {
        let pattern = name_pattern(&query.filter);

        within(query.deadline, async {
            let (total,): (i64,) = sqlx::query_as(
                r#"
                SELECT COUNT(*)
                FROM startups s
                WHERE ($1::text IS NULL OR s.name ILIKE $1)
                "#,
            )
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;
            Ok::<_, DbError>(total)
        })
        .await
    }

    async fn get(&self, id: i64, deadline: Deadline) -> Result<Option<Startup>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {STARTUP_COLUMNS}
            FROM startups s
            LEFT JOIN categories c ON c.id = s.category_id
            WHERE s.id = $1
            "#
        );

        within(deadline, async {
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref()
                .map(startup_from_row)
                .transpose()
                .map_err(DbError::from)
        })
        .await
    }

    async fn find_many(
        &self,
        ids: &[i64],
        order: OrderRule,
        deadline: Deadline,
    ) -> Result<Vec<Startup>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {STARTUP_COLUMNS}
            FROM startups s
            LEFT JOIN categories c ON c.id = s.category_id
            WHERE s.id = ANY($1)
            ORDER BY {}
            "#,
            order_clause(order)
        );

        within(deadline, async {
            let rows = sqlx::query(&sql)
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
            startups_from_rows(rows)
        })
        .await
    }

    async fn rank_of(
        &self,
        id: i64,
        order: OrderRule,
        deadline: Deadline,
    ) -> Result<Option<RankPosition>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT pos, total
            FROM (
                SELECT s.id,
                       ROW_NUMBER() OVER (ORDER BY {}) AS pos,
                       COUNT(*) OVER () AS total
                FROM startups s
            ) ranked
            WHERE id = $1
            "#,
            order_clause(order)
        );

        within(deadline, async {
            let row: Option<(i64, i64)> = sqlx::query_as(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, DbError>(row.map(|(pos, total)| RankPosition {
                index: (pos - 1).max(0) as usize,
                total: total.max(0) as usize,
            }))
        })
        .await
    }

    async fn record_selection(
        &self,
        id: i64,
        deadline: Deadline,
    ) -> Result<Option<Startup>, RepositoryError> {
        let sql = format!(
            r#"
            WITH bumped AS (
                UPDATE startups
                SET count = count + 1, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {STARTUP_COLUMNS}
            FROM bumped s
            LEFT JOIN categories c ON c.id = s.category_id
            "#
        );

        within(deadline, async {
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref()
                .map(startup_from_row)
                .transpose()
                .map_err(DbError::from)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venturectl_core::SearchKeyword;

    #[test]
    fn every_rule_breaks_ties_by_id() {
        for keyword in [
            "id",
            "countDesc",
            "countAsc",
            "simInvestDesc",
            "simInvestAsc",
            "actualInvestDesc",
            "actualInvestAsc",
            "revenueDesc",
            "revenueAsc",
            "employeeDesc",
            "employeeAsc",
        ] {
            let clause = order_clause(OrderRule::resolve(keyword));
            assert!(clause.ends_with("s.id ASC"), "{keyword}: {clause}");
        }
    }

    #[test]
    fn unknown_keyword_orders_by_id() {
        assert_eq!(order_clause(OrderRule::resolve("nope")), "s.id ASC");
    }

    #[test]
    fn name_pattern_escapes_wildcards() {
        assert_eq!(name_pattern(&StartupFilter::All), None);

        let filter = StartupFilter::NameContains(SearchKeyword::new("50%_off\\").unwrap());
        assert_eq!(name_pattern(&filter).as_deref(), Some("%50\\%\\_off\\\\%"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn count_matches_fetch_for_search() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        let repo = PgStartupRepo::new(pool);

        let query = StartupQuery {
            filter: StartupFilter::NameContains(SearchKeyword::new("a").unwrap()),
            ..Default::default()
        };
        let total = repo.count(&query).await.expect("count");
        let items = repo.fetch(&query, 0, total.max(1)).await.expect("fetch");
        assert_eq!(items.len() as i64, total);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn rank_of_agrees_with_ordered_fetch() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        let repo = PgStartupRepo::new(pool);

        let query = StartupQuery {
            order: OrderRule::resolve("simInvestDesc"),
            ..Default::default()
        };
        let total = repo.count(&query).await.expect("count");
        let all = repo.fetch(&query, 0, total.max(1)).await.expect("fetch");
        for (index, startup) in all.iter().enumerate() {
            let position = repo
                .rank_of(startup.id, query.order, Deadline::NONE)
                .await
                .expect("rank_of")
                .expect("present");
            assert_eq!(position.index, index);
            assert_eq!(position.total, all.len());
        }
        assert_eq!(repo.rank_of(-1, query.order, Deadline::NONE).await.expect("rank_of"), None);
    }
}
