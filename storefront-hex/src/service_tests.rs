//! CurrencyService and CartService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use storefront_types::{
        AppError, CartLineItem, CartTotals, PricingPolicy, RateRepository, RateSet, RepoError,
    };

    use crate::{CartService, CurrencyService};

    /// Simple in-memory rate store with a switch that makes every call fail.
    pub struct MockRepo {
        sets: Mutex<HashMap<String, RateSet>>,
        failing: AtomicBool,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                sets: Mutex::new(HashMap::new()),
                failing: AtomicBool::new(false),
            }
        }

        pub fn failing() -> Self {
            let repo = Self::new();
            repo.failing.store(true, Ordering::SeqCst);
            repo
        }

        fn check(&self) -> Result<(), RepoError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(RepoError::Database("connection refused".into()));
            }
            Ok(())
        }

        fn stored(&self, base: &str) -> Option<RateSet> {
            self.sets.lock().unwrap().get(base).cloned()
        }
    }

    #[async_trait]
    impl RateRepository for MockRepo {
        async fn find_rates(&self, base: &str) -> Result<Option<RateSet>, RepoError> {
            self.check()?;
            Ok(self.stored(base))
        }

        async fn upsert_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
            self.check()?;
            self.sets
                .lock()
                .unwrap()
                .insert(set.base.clone(), set.clone());
            Ok(set)
        }

        async fn seed_rates(&self, set: RateSet) -> Result<RateSet, RepoError> {
            self.check()?;
            Ok(self
                .sets
                .lock()
                .unwrap()
                .entry(set.base.clone())
                .or_insert(set)
                .clone())
        }

        async fn list_rates(&self) -> Result<Vec<RateSet>, RepoError> {
            self.check()?;
            let mut sets: Vec<RateSet> = self.sets.lock().unwrap().values().cloned().collect();
            sets.sort_by(|a, b| a.base.cmp(&b.base));
            Ok(sets)
        }
    }

    fn default_rates() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("INR".to_string(), 1.0),
            ("USD".to_string(), 0.012),
            ("EUR".to_string(), 0.011),
            ("GBP".to_string(), 0.0095),
            ("AED".to_string(), 0.044),
        ])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_rates_seeds_empty_store() {
        let service = CurrencyService::new(MockRepo::new());

        let set = service.get_rates(Some("INR")).await.unwrap();

        assert_eq!(set.rates, default_rates());
        assert_eq!(service.repo().stored("INR").unwrap().rates, default_rates());
    }

    #[tokio::test]
    async fn test_get_rates_uses_default_base() {
        let service = CurrencyService::new(MockRepo::new());

        let set = service.get_rates(None).await.unwrap();

        assert_eq!(set.base, "INR");
    }

    #[tokio::test]
    async fn test_get_rates_falls_back_on_storage_fault() {
        let service = CurrencyService::new(MockRepo::failing());

        let set = service.get_rates(Some("INR")).await.unwrap();

        assert_eq!(set.rates, default_rates());
    }

    #[tokio::test]
    async fn test_get_rates_rebases_defaults() {
        let service = CurrencyService::new(MockRepo::new());

        let set = service.get_rates(Some("usd")).await.unwrap();

        assert_eq!(set.base, "USD");
        assert_eq!(set.rates["USD"], 1.0);
    }

    #[tokio::test]
    async fn test_update_forces_base_to_one() {
        let service = CurrencyService::new(MockRepo::new());

        let set = service
            .create_or_update_rates(&json!({"INR": 7, "USD": 0.05}), Some("INR"))
            .await
            .unwrap();

        assert_eq!(set.rates["INR"], 1.0);
        assert_eq!(set.rates["USD"], 0.05);
    }

    #[tokio::test]
    async fn test_update_is_full_replace() {
        let service = CurrencyService::new(MockRepo::new());
        service.get_rates(Some("INR")).await.unwrap();

        service
            .create_or_update_rates(&json!({"USD": 0.05}), Some("INR"))
            .await
            .unwrap();
        let set = service.get_rates(Some("INR")).await.unwrap();

        assert_eq!(
            set.rates,
            BTreeMap::from([("INR".to_string(), 1.0), ("USD".to_string(), 0.05)])
        );
    }

    #[tokio::test]
    async fn test_update_coerces_string_values() {
        let service = CurrencyService::new(MockRepo::new());

        let set = service
            .create_or_update_rates(&json!({"USD": "0.013", "EUR": " 0.012 "}), None)
            .await
            .unwrap();

        assert_eq!(set.rates["USD"], 0.013);
        assert_eq!(set.rates["EUR"], 0.012);
    }

    #[tokio::test]
    async fn test_update_rejects_null_payload() {
        let service = CurrencyService::new(MockRepo::new());

        let result = service
            .create_or_update_rates(&serde_json::Value::Null, None)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_storage_fault_is_internal() {
        let service = CurrencyService::new(MockRepo::failing());

        let result = service
            .create_or_update_rates(&json!({"USD": 0.05}), None)
            .await;

        assert!(matches!(result, Err(AppError::Internal(msg)) if msg == "connection refused"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_convert_identity_skips_store() {
        let service = CurrencyService::new(MockRepo::failing());

        let converted = service
            .convert_price(1234.5, "eur", Some("EUR"))
            .await
            .unwrap();

        assert_eq!(converted, 1234.5);
        assert!(service.repo().stored("EUR").is_none());
    }

    #[tokio::test]
    async fn test_convert_price() {
        let service = CurrencyService::new(MockRepo::new());

        let converted = service.convert_price(2500.0, "USD", None).await.unwrap();

        assert!((converted - 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_convert_unsupported_currency() {
        let service = CurrencyService::new(MockRepo::new());

        let result = service.convert_price(2500.0, "JPY", None).await;

        assert!(matches!(result, Err(AppError::UnsupportedCurrency(code)) if code == "JPY"));
    }

    #[tokio::test]
    async fn test_convert_uses_updated_rates() {
        let service = CurrencyService::new(MockRepo::new());
        service
            .create_or_update_rates(&json!({"USD": 0.05}), None)
            .await
            .unwrap();

        let converted = service.convert_price(100.0, "USD", None).await.unwrap();
        let dropped = service.convert_price(100.0, "EUR", None).await;

        assert!((converted - 5.0).abs() < 1e-9);
        assert!(matches!(dropped, Err(AppError::UnsupportedCurrency(_))));
    }

    #[tokio::test]
    async fn test_convert_negative_price_fails() {
        let service = CurrencyService::new(MockRepo::new());

        let result = service.convert_price(-1.0, "USD", None).await;
        let identity = service.convert_price(-5.0, "INR", Some("INR")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(identity.unwrap(), -5.0);
    }

    #[tokio::test]
    async fn test_convert_totals_rounds_to_cents() {
        let service = CurrencyService::new(MockRepo::new());
        let totals = CartTotals {
            subtotal: 160_000,
            tax: 28_800,
            shipping: 15_000,
            total: 203_800,
        };

        let converted = service.convert_totals(totals, "usd").await.unwrap();

        assert_eq!(converted.currency, "USD");
        assert_eq!(converted.subtotal, 19.2);
        assert_eq!(converted.shipping, 1.8);
        assert_eq!(converted.total, 24.46);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cart
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cart_quote_example() {
        let service = CartService::default();

        let quote = service
            .quote(vec![
                CartLineItem::new("ring", 100_000, 2).with_sale_price(80_000),
            ])
            .unwrap();

        assert_eq!(quote.subtotal, 160_000);
        assert_eq!(quote.tax, 28_800);
        assert_eq!(quote.shipping, 15_000);
        assert_eq!(quote.total, 203_800);
        assert_eq!(quote.items[0].price, 160_000);
    }

    #[test]
    fn test_cart_update_quantity_recomputes() {
        let service = CartService::default();
        let items = vec![CartLineItem::new("ring", 100_000, 2).with_sale_price(80_000)];

        let quote = service.update_quantity(items, "ring", None, 3).unwrap();

        assert_eq!(quote.items[0].price, 240_000);
        assert_eq!(quote.subtotal, 240_000);
        assert_eq!(quote.shipping, 0);
    }

    #[test]
    fn test_cart_remove_unknown_line() {
        let service = CartService::default();

        let result = service.remove_item(vec![CartLineItem::new("ring", 1_000, 1)], "chain", None);

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_cart_custom_policy() {
        let service = CartService::new(PricingPolicy {
            tax_rate_bps: 500,
            free_shipping_threshold: 1_000,
            shipping_fee: 99,
        });

        let quote = service.quote(vec![CartLineItem::new("a", 1_000, 1)]).unwrap();

        assert_eq!(quote.tax, 50);
        assert_eq!(quote.shipping, 99);
        assert_eq!(quote.total, 1_149);
    }
}
