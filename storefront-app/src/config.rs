//! Configuration loading from environment.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use storefront_types::PricingPolicy;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub default_base_currency: String,
    pub rate_limit_per_minute: u32,
    pub pricing: PricingPolicy,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let defaults = PricingPolicy::default();

        Ok(Self {
            port: var_or("PORT", 3000)?,
            database_url,
            default_base_currency: env::var("DEFAULT_BASE_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string()),
            rate_limit_per_minute: var_or("RATE_LIMIT_PER_MINUTE", 100)?,
            pricing: PricingPolicy {
                tax_rate_bps: var_or("CART_TAX_RATE_BPS", defaults.tax_rate_bps)?,
                free_shipping_threshold: var_or(
                    "CART_FREE_SHIPPING_ABOVE",
                    defaults.free_shipping_threshold,
                )?,
                shipping_fee: var_or("CART_SHIPPING_FEE", defaults.shipping_fee)?,
            },
        })
    }
}

/// Parses `name` from the environment, falling back to `default` when unset.
fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_or_default_when_unset() {
        let value: u32 = var_or("STOREFRONT_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_var_or_rejects_garbage() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("STOREFRONT_TEST_BAD_PORT", "eighty") };

        let result: anyhow::Result<u16> = var_or("STOREFRONT_TEST_BAD_PORT", 3000);

        assert!(result.is_err());
    }

    #[test]
    fn test_var_or_parses_trimmed_value() {
        // SAFETY: the variable name is unique to this test.
        unsafe { env::set_var("STOREFRONT_TEST_TAX_BPS", " 1200 ") };

        let value: u32 = var_or("STOREFRONT_TEST_TAX_BPS", 1800).unwrap();

        assert_eq!(value, 1200);
    }
}
