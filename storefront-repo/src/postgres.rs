//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use storefront_types::{RateRepository, RateSet, RepoError};

use crate::types::PgRateRow;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository storing each rate set as a JSONB document.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_currency_rates_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateRepository for PostgresRepo {
    async fn find_rates(&self, base: &str) -> Result<Option<RateSet>, RepoError> {
        let row: Option<PgRateRow> = sqlx::query_as(
            r#"SELECT base, rates, last_updated FROM currency_rates WHERE base = $1"#,
        )
        .bind(base)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(PgRateRow::into_domain).transpose()
    }

    async fn upsert_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
        let row: PgRateRow = sqlx::query_as(
            r#"INSERT INTO currency_rates (base, rates, last_updated) VALUES ($1, $2, $3)
               ON CONFLICT (base) DO UPDATE SET rates = EXCLUDED.rates, last_updated = EXCLUDED.last_updated
               RETURNING base, rates, last_updated"#,
        )
        .bind(&set.base)
        .bind(Json(&set.rates))
        .bind(set.last_updated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(base = %row.base, "rate set upserted");
        row.into_domain()
    }

    async fn seed_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
        let inserted: Option<PgRateRow> = sqlx::query_as(
            r#"INSERT INTO currency_rates (base, rates, last_updated) VALUES ($1, $2, $3)
               ON CONFLICT (base) DO NOTHING
               RETURNING base, rates, last_updated"#,
        )
        .bind(&set.base)
        .bind(Json(&set.rates))
        .bind(set.last_updated)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        match inserted {
            Some(row) => {
                tracing::info!(base = %row.base, "seeded default rate set");
                row.into_domain()
            }
            None => self.find_rates(&set.base).await?.ok_or(RepoError::NotFound),
        }
    }

    async fn list_rates(&self) -> Result<Vec<RateSet>, RepoError> {
        let rows: Vec<PgRateRow> = sqlx::query_as(
            r#"SELECT base, rates, last_updated FROM currency_rates ORDER BY base ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(PgRateRow::into_domain).collect()
    }
}
