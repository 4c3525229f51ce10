//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CartLineItem, CartTotals};

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query string for `GET /currency/rates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
}

/// Admin request to replace the rate set for a base currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRatesRequest {
    /// Currency code -> factor; values may be numbers or numeric strings
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"USD": "0.012", "EUR": "0.011"}))]
    pub rates: serde_json::Value,
    /// Base currency; defaults to the configured default base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "INR")]
    pub base: Option<String>,
}

/// Response after replacing a rate set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatesResponse {
    #[schema(example = "INR")]
    pub base: String,
    pub last_updated: DateTime<Utc>,
}

/// Request to convert a price between currencies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPriceRequest {
    /// Price in the base currency; a number or numeric string
    #[serde(default)]
    #[schema(value_type = f64, example = 2500)]
    pub price: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub target_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "INR")]
    pub base_currency: Option<String>,
}

/// Result of a price conversion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPriceResponse {
    #[schema(example = 2500)]
    pub original_price: f64,
    #[schema(example = "INR")]
    pub original_currency: String,
    #[schema(example = 30.0)]
    pub converted_price: f64,
    #[schema(example = "USD")]
    pub target_currency: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to price a cart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotalsRequest {
    pub items: Vec<CartLineItem>,
    /// Optional display currency for converted totals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub currency: Option<String>,
}

/// Request to change one line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub items: Vec<CartLineItem>,
    #[schema(example = "ring-0042")]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[schema(example = 3)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Request to drop one line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub items: Vec<CartLineItem>,
    #[schema(example = "ring-0042")]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Totals converted into a display currency, in major units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTotals {
    #[schema(example = "USD")]
    pub currency: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

/// Priced cart: refreshed lines plus totals in smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub items: Vec<CartLineItem>,
    #[schema(example = 160000)]
    pub subtotal: i64,
    #[schema(example = 28800)]
    pub tax: i64,
    #[schema(example = 15000)]
    pub shipping: i64,
    #[schema(example = 203800)]
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted: Option<ConvertedTotals>,
}

impl CartQuote {
    pub fn new(items: Vec<CartLineItem>, totals: CartTotals) -> Self {
        Self {
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            shipping: totals.shipping,
            total: totals.total,
            converted: None,
        }
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
        }
    }
}
