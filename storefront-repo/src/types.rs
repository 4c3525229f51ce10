//! Database row types, one per backend.

use sqlx::FromRow;

use storefront_types::{RateSet, RepoError};

/// Rate row as stored by SQLite: JSON text and RFC 3339 timestamp.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteRateRow {
    pub base: String,
    pub rates: String,
    pub last_updated: String,
}

#[cfg(feature = "sqlite")]
impl SqliteRateRow {
    pub fn into_domain(self) -> Result<RateSet, RepoError> {
        let rates = serde_json::from_str(&self.rates)
            .map_err(|e| RepoError::Serialization(format!("rates for {}: {}", self.base, e)))?;

        let last_updated = chrono::DateTime::parse_from_rfc3339(&self.last_updated)
            .map_err(|e| RepoError::Serialization(format!("last_updated: {}", e)))?
            .with_timezone(&chrono::Utc);

        Ok(RateSet::from_parts(self.base, rates, last_updated))
    }
}

/// Rate row as stored by PostgreSQL: JSONB and TIMESTAMPTZ.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgRateRow {
    pub base: String,
    pub rates: sqlx::types::Json<std::collections::BTreeMap<String, f64>>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "postgres")]
impl PgRateRow {
    pub fn into_domain(self) -> Result<RateSet, RepoError> {
        Ok(RateSet::from_parts(
            self.base,
            self.rates.0,
            self.last_updated,
        ))
    }
}
