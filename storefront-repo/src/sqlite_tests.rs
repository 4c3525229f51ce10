//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use storefront_types::{RateRepository, RateSet};

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn rates(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(c, f)| (c.to_string(), *f)).collect()
    }

    #[tokio::test]
    async fn test_find_rates_empty() {
        let repo = setup_repo().await;

        let result = repo.find_rates("INR").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_then_find() {
        let repo = setup_repo().await;

        let set = RateSet::new("INR", rates(&[("USD", 0.012), ("EUR", 0.011)])).unwrap();
        repo.upsert_rates(set.clone()).await.unwrap();

        let fetched = repo.find_rates("INR").await.unwrap().unwrap();

        assert_eq!(fetched.base, "INR");
        assert_eq!(fetched.rates, set.rates);
        assert_eq!(fetched.last_updated, set.last_updated);
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_document() {
        let repo = setup_repo().await;

        repo.upsert_rates(RateSet::defaults("INR").unwrap())
            .await
            .unwrap();
        repo.upsert_rates(RateSet::new("INR", rates(&[("USD", 0.05)])).unwrap())
            .await
            .unwrap();

        let fetched = repo.find_rates("INR").await.unwrap().unwrap();

        assert_eq!(fetched.rates, rates(&[("INR", 1.0), ("USD", 0.05)]));
    }

    #[tokio::test]
    async fn test_seed_inserts_when_absent() {
        let repo = setup_repo().await;

        let seeded = repo
            .seed_rates(RateSet::defaults("INR").unwrap())
            .await
            .unwrap();

        assert_eq!(seeded.rates.len(), 5);
        assert!(repo.find_rates("INR").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_row() {
        let repo = setup_repo().await;

        repo.upsert_rates(RateSet::new("INR", rates(&[("USD", 0.05)])).unwrap())
            .await
            .unwrap();

        let stored = repo
            .seed_rates(RateSet::defaults("INR").unwrap())
            .await
            .unwrap();

        assert_eq!(stored.rates, rates(&[("INR", 1.0), ("USD", 0.05)]));
    }

    #[tokio::test]
    async fn test_bases_are_independent() {
        let repo = setup_repo().await;

        repo.upsert_rates(RateSet::defaults("INR").unwrap())
            .await
            .unwrap();
        repo.upsert_rates(RateSet::new("USD", rates(&[("INR", 83.0)])).unwrap())
            .await
            .unwrap();

        let all = repo.list_rates().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].base, "INR");
        assert_eq!(all[1].base, "USD");
        assert_eq!(all[1].rates["USD"], 1.0);
    }

    #[tokio::test]
    async fn test_factors_round_trip_exactly() {
        let repo = setup_repo().await;

        repo.upsert_rates(RateSet::defaults("INR").unwrap())
            .await
            .unwrap();

        let fetched = repo.find_rates("INR").await.unwrap().unwrap();

        assert_eq!(fetched.rates["GBP"], 0.0095);
        assert_eq!(fetched.rates["AED"], 0.044);
    }
}
