//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use storefront_types::{RateRepository, RateSet, RepoError};

use crate::types::SqliteRateRow;

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every in-memory connection is its own database, so pin the pool to one.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_currency_rates.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn fetch(&self, base: &str) -> Result<Option<RateSet>, RepoError> {
        let row: Option<SqliteRateRow> =
            sqlx::query_as(r#"SELECT base, rates, last_updated FROM currency_rates WHERE base = ?"#)
                .bind(base)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqliteRateRow::into_domain).transpose()
    }
}

fn encode_rates(set: &RateSet) -> Result<String, RepoError> {
    serde_json::to_string(&set.rates).map_err(|e| RepoError::Serialization(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateRepository for SqliteRepo {
    async fn find_rates(&self, base: &str) -> Result<Option<RateSet>, RepoError> {
        self.fetch(base).await
    }

    async fn upsert_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
        let rates = encode_rates(&set)?;

        sqlx::query(
            r#"INSERT INTO currency_rates (base, rates, last_updated) VALUES (?, ?, ?)
               ON CONFLICT(base) DO UPDATE SET rates = excluded.rates, last_updated = excluded.last_updated"#,
        )
        .bind(&set.base)
        .bind(&rates)
        .bind(set.last_updated.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(base = %set.base, currencies = set.rates.len(), "rate set upserted");
        Ok(set)
    }

    async fn seed_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
        let rates = encode_rates(&set)?;

        let result = sqlx::query(
            r#"INSERT INTO currency_rates (base, rates, last_updated) VALUES (?, ?, ?)
               ON CONFLICT(base) DO NOTHING"#,
        )
        .bind(&set.base)
        .bind(&rates)
        .bind(set.last_updated.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 1 {
            tracing::info!(base = %set.base, "seeded default rate set");
            return Ok(set);
        }

        self.fetch(&set.base).await?.ok_or(RepoError::NotFound)
    }

    async fn list_rates(&self) -> Result<Vec<RateSet>, RepoError> {
        let rows: Vec<SqliteRateRow> = sqlx::query_as(
            r#"SELECT base, rates, last_updated FROM currency_rates ORDER BY base ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(SqliteRateRow::into_domain).collect()
    }
}
