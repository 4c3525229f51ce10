//! Storefront Application Services
//!
//! Orchestrates domain operations through the rate store port.
//! Contains NO infrastructure logic - pure business orchestration.

use storefront_types::{
    AppError, Cart, CartLineItem, CartQuote, CartTotals, ConvertedTotals, PricingPolicy,
    RateRepository, RateSet, normalize_code,
};

/// Minor units per major unit for every catalogue currency.
const MINOR_PER_MAJOR: f64 = 100.0;

/// Application service for currency rates and conversion.
///
/// Generic over `R: RateRepository` - the adapter is injected at compile time.
pub struct CurrencyService<R: RateRepository> {
    repo: R,
    default_base: String,
}

impl<R: RateRepository> CurrencyService<R> {
    /// Creates a currency service whose default base is INR.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            default_base: exchange_rates::DEFAULT_BASE.code().to_string(),
        }
    }

    /// Overrides the base used when a request omits one.
    pub fn with_default_base(mut self, base: &str) -> Result<Self, AppError> {
        self.default_base = normalize_code(base)?;
        Ok(self)
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn default_base(&self) -> &str {
        &self.default_base
    }

    /// Normalizes a requested base, falling back to the default base.
    pub fn resolve_base(&self, base: Option<&str>) -> Result<String, AppError> {
        match base {
            Some(code) if !code.trim().is_empty() => Ok(normalize_code(code)?),
            _ => Ok(self.default_base.clone()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets the latest rate set for a base, seeding defaults on first use.
    ///
    /// Storage faults never surface here: the default table is returned instead.
    pub async fn get_rates(&self, base: Option<&str>) -> Result<RateSet, AppError> {
        let base = self.resolve_base(base)?;

        match self.repo.find_rates(&base).await {
            Ok(Some(set)) => Ok(set),
            Ok(None) => {
                let defaults = RateSet::defaults(&base)?;
                match self.repo.seed_rates(defaults.clone()).await {
                    Ok(stored) => Ok(stored),
                    Err(e) => {
                        tracing::warn!(%base, error = %e, "failed to seed default rates");
                        Ok(defaults)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(%base, error = %e, "rate store read failed, serving defaults");
                Ok(RateSet::defaults(&base)?)
            }
        }
    }

    /// Lists every stored rate set.
    pub async fn list_rates(&self) -> Result<Vec<RateSet>, AppError> {
        self.repo.list_rates().await.map_err(Into::into)
    }

    /// Replaces the rate set for a base with the given payload.
    ///
    /// The base entry is forced to 1. Prior currencies not present in the
    /// payload are dropped.
    pub async fn create_or_update_rates(
        &self,
        rates: &serde_json::Value,
        base: Option<&str>,
    ) -> Result<RateSet, AppError> {
        let base = self.resolve_base(base)?;
        let factors = RateSet::coerce_factors(rates)?;
        let set = RateSet::new(&base, factors)?;

        let stored = self.repo.upsert_rates(set).await?;
        tracing::info!(base = %stored.base, currencies = stored.rates.len(), "currency rates updated");
        Ok(stored)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts a price from `base` into `target`.
    pub async fn convert_price(
        &self,
        price: f64,
        target: &str,
        base: Option<&str>,
    ) -> Result<f64, AppError> {
        if !price.is_finite() {
            return Err(AppError::BadRequest("Price must be a number".into()));
        }

        let base = self.resolve_base(base)?;
        let target = normalize_code(target)?;
        if target == base {
            return Ok(price);
        }
        if price < 0.0 {
            return Err(AppError::BadRequest("Price cannot be negative".into()));
        }

        let rates = self.get_rates(Some(&base)).await?;
        Ok(rates.convert(price, &target)?)
    }

    /// Converts cart totals (minor units of the default base) into major
    /// units of `currency`, rounded to two decimals.
    pub async fn convert_totals(
        &self,
        totals: CartTotals,
        currency: &str,
    ) -> Result<ConvertedTotals, AppError> {
        let target = normalize_code(currency)?;
        let rates = self.get_rates(None).await?;

        let convert = |minor: i64| -> Result<f64, AppError> {
            let major = minor as f64 / MINOR_PER_MAJOR;
            let converted = rates.convert(major, &target)?;
            Ok((converted * 100.0).round() / 100.0)
        };

        Ok(ConvertedTotals {
            subtotal: convert(totals.subtotal)?,
            tax: convert(totals.tax)?,
            shipping: convert(totals.shipping)?,
            total: convert(totals.total)?,
            currency: target.clone(),
        })
    }
}

/// Application service for the cart pricing pipeline.
///
/// Every call recomputes from the full list of lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartService {
    policy: PricingPolicy,
}

impl CartService {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Prices a cart as received.
    pub fn quote(&self, items: Vec<CartLineItem>) -> Result<CartQuote, AppError> {
        let cart = Cart::from_items(items)?;
        self.finish(cart)
    }

    /// Changes one line's quantity, then prices the cart.
    pub fn update_quantity(
        &self,
        items: Vec<CartLineItem>,
        product_id: &str,
        variant: Option<&str>,
        quantity: u32,
    ) -> Result<CartQuote, AppError> {
        let mut cart = Cart::from_items(items)?;
        cart.update_quantity(product_id, variant, quantity)?;
        self.finish(cart)
    }

    /// Removes one line, then prices the cart.
    pub fn remove_item(
        &self,
        items: Vec<CartLineItem>,
        product_id: &str,
        variant: Option<&str>,
    ) -> Result<CartQuote, AppError> {
        let mut cart = Cart::from_items(items)?;
        cart.remove_item(product_id, variant)?;
        self.finish(cart)
    }

    fn finish(&self, cart: Cart) -> Result<CartQuote, AppError> {
        let totals = cart.totals(&self.policy)?;
        Ok(CartQuote::new(cart.into_items(), totals))
    }
}
