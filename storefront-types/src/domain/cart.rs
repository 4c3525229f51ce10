//! Cart line items and the pricing pipeline.
//!
//! All amounts are in the smallest currency unit (paise for INR) so the
//! subtotal, tax, shipping and total are exact integers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Quantity ceiling applied when stock is unknown, and the cap otherwise.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// One product variant in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product identifier
    #[schema(example = "ring-0042")]
    pub product_id: String,
    /// Display name
    #[serde(default)]
    #[schema(example = "Solitaire Ring")]
    pub name: String,
    /// Variant label (size, metal, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "18K / size 12")]
    pub variant: Option<String>,
    /// List price per unit, in smallest currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 100000)]
    pub list_price: Option<i64>,
    /// Sale price per unit, used when lower than the list price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 80000)]
    pub sale_price: Option<i64>,
    /// Precomputed single-unit price, used when no list price is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_quantity_price: Option<i64>,
    /// Units in the cart
    #[schema(example = 2)]
    pub quantity: u32,
    /// Units available, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Line total (effective price x quantity), refreshed on every cart change
    #[serde(default)]
    pub price: i64,
}

impl CartLineItem {
    /// Creates a line at list price with unknown stock.
    pub fn new(product_id: impl Into<String>, list_price: i64, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            name: String::new(),
            variant: None,
            list_price: Some(list_price),
            sale_price: None,
            one_quantity_price: None,
            quantity,
            stock: None,
            price: 0,
        }
    }

    pub fn with_sale_price(mut self, sale_price: i64) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Human-readable key used in error messages.
    pub fn key(&self) -> String {
        match &self.variant {
            Some(v) => format!("{}:{}", self.product_id, v),
            None => self.product_id.clone(),
        }
    }

    /// Whether this line holds the given product variant.
    pub fn matches(&self, product_id: &str, variant: Option<&str>) -> bool {
        self.product_id == product_id && self.variant.as_deref() == variant
    }

    /// The unit price actually charged.
    ///
    /// Sale price when present, positive and below the list price; otherwise
    /// the list price; otherwise the one-quantity price.
    pub fn effective_price(&self) -> Result<i64, DomainError> {
        let on_sale = self
            .sale_price
            .filter(|&sale| sale > 0 && self.list_price.is_none_or(|list| sale < list));
        if let Some(sale) = on_sale {
            return Ok(sale);
        }

        match self.list_price.or(self.one_quantity_price) {
            Some(price) if price >= 0 => Ok(price),
            Some(price) => Err(DomainError::ValidationError(format!(
                "Line item {} has a negative price: {}",
                self.key(),
                price
            ))),
            None => Err(DomainError::MissingPrice(self.key())),
        }
    }

    /// Largest quantity this line may hold.
    pub fn max_quantity(&self) -> u32 {
        self.stock
            .map_or(DEFAULT_MAX_QUANTITY, |stock| stock.min(DEFAULT_MAX_QUANTITY))
    }

    /// Effective price x quantity.
    pub fn line_total(&self) -> Result<i64, DomainError> {
        self.effective_price()?
            .checked_mul(i64::from(self.quantity))
            .ok_or(DomainError::Overflow("line total"))
    }

    /// Recomputes and stores the derived `price` field.
    pub fn refresh_price(&mut self) -> Result<(), DomainError> {
        self.price = self.line_total()?;
        Ok(())
    }
}

/// Tax and shipping rules applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat tax rate in basis points (1800 = 18%)
    pub tax_rate_bps: u32,
    /// Subtotals strictly above this ship free
    pub free_shipping_threshold: i64,
    /// Flat fee charged otherwise
    pub shipping_fee: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_bps: 1800,
            free_shipping_threshold: 200_000,
            shipping_fee: 15_000,
        }
    }
}

impl PricingPolicy {
    /// Tax on a subtotal, rounded half-up to the nearest minor unit.
    pub fn tax_on(&self, subtotal: i64) -> Result<i64, DomainError> {
        let tax = (i128::from(subtotal) * i128::from(self.tax_rate_bps) + 5_000) / 10_000;
        i64::try_from(tax).map_err(|_| DomainError::Overflow("tax"))
    }

    pub fn shipping_for(&self, subtotal: i64) -> i64 {
        if subtotal > self.free_shipping_threshold {
            0
        } else {
            self.shipping_fee
        }
    }
}

/// Derived totals for a cart, in smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    #[schema(example = 160000)]
    pub subtotal: i64,
    #[schema(example = 28800)]
    pub tax: i64,
    #[schema(example = 15000)]
    pub shipping: i64,
    #[schema(example = 203800)]
    pub total: i64,
}

/// Recomputes totals from scratch over the given lines.
pub fn compute_totals(
    items: &[CartLineItem],
    policy: &PricingPolicy,
) -> Result<CartTotals, DomainError> {
    let subtotal = items.iter().try_fold(0i64, |acc, item| {
        acc.checked_add(item.line_total()?)
            .ok_or(DomainError::Overflow("subtotal"))
    })?;

    let tax = policy.tax_on(subtotal)?;
    let shipping = policy.shipping_for(subtotal);
    let total = subtotal
        .checked_add(tax)
        .and_then(|t| t.checked_add(shipping))
        .ok_or(DomainError::Overflow("total"))?;

    Ok(CartTotals {
        subtotal,
        tax,
        shipping,
        total,
    })
}

/// An ephemeral cart. Every mutation refreshes the per-line `price` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps lines received from a client and refreshes their line totals.
    ///
    /// Every line must hold between 1 and its ceiling.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, DomainError> {
        let mut cart = Self { items };
        for item in &mut cart.items {
            let max = item.max_quantity();
            if item.quantity == 0 || item.quantity > max {
                return Err(DomainError::InvalidQuantity {
                    quantity: item.quantity,
                    max,
                });
            }
            item.refresh_price()?;
        }
        Ok(cart)
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a line, merging with an existing line for the same variant.
    ///
    /// The resulting quantity is clamped to the line's ceiling.
    pub fn add_item(&mut self, mut item: CartLineItem) -> Result<(), DomainError> {
        if item.quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                quantity: 0,
                max: item.max_quantity(),
            });
        }

        let existing = self
            .items
            .iter_mut()
            .find(|line| line.matches(&item.product_id, item.variant.as_deref()));

        match existing {
            Some(line) => {
                let wanted = line.quantity.saturating_add(item.quantity);
                line.quantity = wanted.min(line.max_quantity());
                if line.quantity == 0 {
                    return Err(DomainError::InvalidQuantity {
                        quantity: wanted,
                        max: 0,
                    });
                }
                line.refresh_price()
            }
            None => {
                let max = item.max_quantity();
                if max == 0 {
                    return Err(DomainError::InvalidQuantity {
                        quantity: item.quantity,
                        max,
                    });
                }
                item.quantity = item.quantity.min(max);
                item.refresh_price()?;
                self.items.push(item);
                Ok(())
            }
        }
    }

    /// Sets a line's quantity and writes back its line total.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        variant: Option<&str>,
        quantity: u32,
    ) -> Result<&CartLineItem, DomainError> {
        let line = self
            .items
            .iter_mut()
            .find(|line| line.matches(product_id, variant))
            .ok_or_else(|| DomainError::LineItemNotFound(line_key(product_id, variant)))?;

        let max = line.max_quantity();
        if quantity == 0 || quantity > max {
            return Err(DomainError::InvalidQuantity { quantity, max });
        }

        line.quantity = quantity;
        line.refresh_price()?;
        Ok(line)
    }

    /// Removes a line and returns it.
    pub fn remove_item(
        &mut self,
        product_id: &str,
        variant: Option<&str>,
    ) -> Result<CartLineItem, DomainError> {
        let index = self
            .items
            .iter()
            .position(|line| line.matches(product_id, variant))
            .ok_or_else(|| DomainError::LineItemNotFound(line_key(product_id, variant)))?;
        Ok(self.items.remove(index))
    }

    pub fn totals(&self, policy: &PricingPolicy) -> Result<CartTotals, DomainError> {
        compute_totals(&self.items, policy)
    }
}

fn line_key(product_id: &str, variant: Option<&str>) -> String {
    match variant {
        Some(v) => format!("{}:{}", product_id, v),
        None => product_id.to_string(),
    }
}
