//! Rate store port trait.
//!
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::RateSet;
use crate::error::RepoError;

/// Durable storage for currency rate sets, one per base currency.
///
/// No locking is implied: concurrent upserts for the same base race and the
/// last writer wins.
#[async_trait::async_trait]
pub trait RateRepository: Send + Sync + 'static {
    /// Gets the stored rate set for a base currency.
    async fn find_rates(&self, base: &str) -> Result<Option<RateSet>, RepoError>;

    /// Inserts or wholly replaces the rate set for `set.base`.
    async fn upsert_rates(&self, set: RateSet) -> Result<RateSet, RepoError>;

    /// Inserts `set` only when no row exists for its base, then returns
    /// whatever is stored.
    async fn seed_rates(&self, set: RateSet) -> Result<RateSet, RepoError>;

    /// Lists every stored rate set, ordered by base code.
    async fn list_rates(&self) -> Result<Vec<RateSet>, RepoError>;
}
