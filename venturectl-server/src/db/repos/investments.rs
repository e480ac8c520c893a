//! Mock investment repository
//!
//! All mutations are keyed by investment id. Each write is one statement that
//! also moves the amount on the owning startup's `sim_invest`, so the total
//! never drifts from the rows behind it. Password checks sit in the same
//! statement's WHERE, so a mismatch never mutates.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use venturectl_core::{
    Amount, Deadline, DeleteOutcome, Investment, InvestmentPatch, InvestmentRepository,
    NewInvestment, RepositoryError, UpdateOutcome,
};

use super::{is_foreign_key_violation, within, DbError};

const INVESTMENT_COLUMNS: &str =
    "id, startup_id, name, invest_amount, comment, created_at, updated_at";

fn investment_from_row(row: &PgRow) -> Result<Investment, sqlx::Error> {
    Ok(Investment {
        id: row.try_get("id")?,
        startup_id: row.try_get("startup_id")?,
        name: row.try_get("name")?,
        invest_amount: Amount::from(row.try_get::<BigDecimal, _>("invest_amount")?),
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Map a write failure, turning a dangling startup reference into NotFound.
fn write_error(err: sqlx::Error, startup_id: Option<i64>) -> RepositoryError {
    if is_foreign_key_violation(&err) {
        return RepositoryError::not_found(
            "startup",
            startup_id.map(|id| id.to_string()).unwrap_or_default(),
        );
    }
    DbError::from(err).into()
}

/// Investment repository backed by Postgres
#[derive(Clone)]
pub struct PgInvestmentRepo {
    pool: PgPool,
}

impl PgInvestmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvestmentRepository for PgInvestmentRepo {
    async fn get(
        &self,
        id: i64,
        deadline: Deadline,
    ) -> Result<Option<Investment>, RepositoryError> {
        let sql = format!("SELECT {INVESTMENT_COLUMNS} FROM mock_investors WHERE id = $1");

        within(deadline, async {
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref()
                .map(investment_from_row)
                .transpose()
                .map_err(DbError::from)
        })
        .await
    }

    async fn create(
        &self,
        new: &NewInvestment,
        deadline: Deadline,
    ) -> Result<Investment, RepositoryError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO mock_investors (startup_id, name, invest_amount, comment, password)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {INVESTMENT_COLUMNS}
            ),
            bumped AS (
                UPDATE startups s
                SET sim_invest = s.sim_invest + inserted.invest_amount, updated_at = NOW()
                FROM inserted
                WHERE s.id = inserted.startup_id
            )
            SELECT {INVESTMENT_COLUMNS} FROM inserted
            "#
        );

        let result = within(deadline, async {
            Ok(sqlx::query(&sql)
                .bind(new.startup_id)
                .bind(&new.name)
                .bind(new.invest_amount.as_decimal())
                .bind(&new.comment)
                .bind(&new.password)
                .fetch_one(&self.pool)
                .await)
        })
        .await?;

        let row = result.map_err(|e| write_error(e, Some(new.startup_id)))?;
        let investment =
            investment_from_row(&row).map_err(|e| RepositoryError::from(DbError::from(e)))?;
        tracing::info!(
            investment_id = investment.id,
            startup_id = investment.startup_id,
            "investment created"
        );
        Ok(investment)
    }

    async fn update(
        &self,
        id: i64,
        patch: &InvestmentPatch,
        deadline: Deadline,
    ) -> Result<UpdateOutcome, RepositoryError> {
        // Old and new startup may be the same row, so the per-startup change
        // is summed before the single UPDATE of startups.
        let sql = r#"
            WITH old AS (
                SELECT id, startup_id, invest_amount
                FROM mock_investors
                WHERE id = $1 AND ($6::text IS NULL OR password = $7)
                FOR UPDATE
            ),
            updated AS (
                UPDATE mock_investors m
                SET startup_id = COALESCE($2, m.startup_id),
                    name = COALESCE($3, m.name),
                    invest_amount = COALESCE($4, m.invest_amount),
                    comment = COALESCE($5, m.comment),
                    password = COALESCE($6, m.password),
                    updated_at = NOW()
                FROM old
                WHERE m.id = old.id
                RETURNING m.id, m.startup_id, m.name, m.invest_amount, m.comment,
                          m.created_at, m.updated_at,
                          old.startup_id AS old_startup_id,
                          old.invest_amount AS old_amount
            ),
            deltas AS (
                SELECT startup_id, SUM(delta) AS delta
                FROM (
                    SELECT old_startup_id AS startup_id, -old_amount AS delta FROM updated
                    UNION ALL
                    SELECT startup_id, invest_amount FROM updated
                ) moved
                GROUP BY startup_id
            ),
            bumped AS (
                UPDATE startups s
                SET sim_invest = GREATEST(s.sim_invest + deltas.delta, 0), updated_at = NOW()
                FROM deltas
                WHERE s.id = deltas.startup_id AND deltas.delta <> 0
            )
            SELECT id, startup_id, name, invest_amount, comment, created_at, updated_at
            FROM updated
            "#;

        let result = within(deadline, async {
            Ok(sqlx::query(sql)
                .bind(id)
                .bind(patch.startup_id)
                .bind(patch.name.as_deref())
                .bind(patch.invest_amount.as_ref().map(Amount::as_decimal))
                .bind(patch.comment.as_deref())
                .bind(patch.password.as_deref())
                .bind(patch.current_password.as_deref())
                .fetch_optional(&self.pool)
                .await)
        })
        .await?;

        let row = result.map_err(|e| write_error(e, patch.startup_id))?;
        if let Some(row) = row {
            let investment =
                investment_from_row(&row).map_err(|e| RepositoryError::from(DbError::from(e)))?;
            tracing::info!(
                investment_id = investment.id,
                startup_id = investment.startup_id,
                "investment updated"
            );
            return Ok(UpdateOutcome::Updated(investment));
        }

        if patch.password.is_none() {
            return Ok(UpdateOutcome::NotFound);
        }
        let exists = self.exists(id, deadline).await?;
        Ok(if exists {
            UpdateOutcome::PasswordMismatch
        } else {
            UpdateOutcome::NotFound
        })
    }

    async fn delete(
        &self,
        id: i64,
        password: &str,
        deadline: Deadline,
    ) -> Result<DeleteOutcome, RepositoryError> {
        let deleted = within(deadline, async {
            let row: Option<(i64,)> = sqlx::query_as(
                r#"
                WITH deleted AS (
                    DELETE FROM mock_investors
                    WHERE id = $1 AND password = $2
                    RETURNING id, startup_id, invest_amount
                ),
                bumped AS (
                    UPDATE startups s
                    SET sim_invest = GREATEST(s.sim_invest - deleted.invest_amount, 0),
                        updated_at = NOW()
                    FROM deleted
                    WHERE s.id = deleted.startup_id
                )
                SELECT id FROM deleted
                "#,
            )
            .bind(id)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?;
            Ok::<_, DbError>(row.is_some())
        })
        .await?;

        if deleted {
            tracing::info!(investment_id = id, "investment deleted");
            return Ok(DeleteOutcome::Deleted);
        }

        Ok(if self.exists(id, deadline).await? {
            DeleteOutcome::PasswordMismatch
        } else {
            DeleteOutcome::NotFound
        })
    }
}

impl PgInvestmentRepo {
    /// Tells a password mismatch apart from a missing id after a write
    /// matched no row.
    async fn exists(&self, id: i64, deadline: Deadline) -> Result<bool, RepositoryError> {
        within(deadline, async {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM mock_investors WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok::<_, DbError>(exists)
        })
        .await
    }
}
