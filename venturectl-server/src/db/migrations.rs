//! Schema setup for the catalog tables
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

use super::repos::DbError;

/// Create tables and indexes if they are missing.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running catalog migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Money columns hold integers wider than 64 bits
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS startups (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            image TEXT,
            category_id BIGINT REFERENCES categories(id) ON DELETE SET NULL,
            actual_invest NUMERIC(78, 0) NOT NULL DEFAULT 0,
            sim_invest NUMERIC(78, 0) NOT NULL DEFAULT 0,
            revenue NUMERIC(78, 0) NOT NULL DEFAULT 0,
            employees INTEGER NOT NULL DEFAULT 0,
            count BIGINT NOT NULL DEFAULT 0 CHECK (count >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mock_investors (
            id BIGSERIAL PRIMARY KEY,
            startup_id BIGINT NOT NULL REFERENCES startups(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            invest_amount NUMERIC(78, 0) NOT NULL CHECK (invest_amount >= 0),
            comment TEXT NOT NULL DEFAULT '',
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_startups_count ON startups (count DESC, id)",
        "CREATE INDEX IF NOT EXISTS idx_startups_sim_invest ON startups (sim_invest DESC, id)",
        "CREATE INDEX IF NOT EXISTS idx_startups_category ON startups (category_id)",
        "CREATE INDEX IF NOT EXISTS idx_mock_investors_startup ON mock_investors (startup_id)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    tracing::info!("Catalog migrations complete");
    Ok(())
}
