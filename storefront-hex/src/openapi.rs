//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use storefront_types::domain::{CartLineItem, CartTotals, RateSet};
use storefront_types::dto::{
    CartQuote, CartTotalsRequest, ConvertPriceRequest, ConvertPriceResponse, ConvertedTotals,
    RemoveItemRequest, UpdateQuantityRequest, UpdateRatesRequest, UpdateRatesResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Get the rate set for a base currency
#[utoipa::path(
    get,
    path = "/currency/rates",
    tag = "currency",
    params(
        ("base" = Option<String>, Query, description = "Base currency code (defaults to INR)")
    ),
    responses(
        (status = 200, description = "Rate set, seeded with defaults on first read", body = RateSet),
        (status = 400, description = "Malformed currency code")
    )
)]
async fn get_rates() {}

/// List every stored rate set
#[utoipa::path(
    get,
    path = "/currency/rates/all",
    tag = "currency",
    responses(
        (status = 200, description = "All stored rate sets", body = Vec<RateSet>),
        (status = 500, description = "Rate store unavailable")
    )
)]
async fn list_rates() {}

/// Replace the rate set for a base currency
#[utoipa::path(
    post,
    path = "/currency/rates/update",
    tag = "currency",
    request_body = UpdateRatesRequest,
    responses(
        (status = 200, description = "Rates stored", body = UpdateRatesResponse),
        (status = 400, description = "Rates missing or not numeric"),
        (status = 500, description = "Rate store unavailable")
    )
)]
async fn update_rates() {}

/// Convert a price into a target currency
#[utoipa::path(
    post,
    path = "/currency/convert",
    tag = "currency",
    request_body = ConvertPriceRequest,
    responses(
        (status = 200, description = "Converted price", body = ConvertPriceResponse),
        (status = 400, description = "Invalid price, missing target or unsupported currency")
    )
)]
async fn convert_price() {}

/// Price a cart
#[utoipa::path(
    post,
    path = "/cart/totals",
    tag = "cart",
    request_body = CartTotalsRequest,
    responses(
        (status = 200, description = "Priced cart", body = CartQuote),
        (status = 400, description = "Line without a usable price")
    )
)]
async fn cart_totals() {}

/// Change one line's quantity and reprice
#[utoipa::path(
    post,
    path = "/cart/quantity",
    tag = "cart",
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Priced cart", body = CartQuote),
        (status = 400, description = "Quantity outside 1..=max"),
        (status = 404, description = "Line not in cart")
    )
)]
async fn update_quantity() {}

/// Remove one line and reprice
#[utoipa::path(
    post,
    path = "/cart/remove",
    tag = "cart",
    request_body = RemoveItemRequest,
    responses(
        (status = 200, description = "Priced cart", body = CartQuote),
        (status = 404, description = "Line not in cart")
    )
)]
async fn remove_item() {}

/// OpenAPI documentation for the storefront pricing API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Pricing API",
        version = "1.0.0",
        description = "Currency rates, price conversion and cart totals for the jewelry storefront.\n\nCart amounts are integers in the smallest unit of the base currency (paise for INR). Successful responses are wrapped as `{\"success\": true, \"data\": ...}`; errors as `{\"success\": false, \"message\": ...}`.",
        license(name = "MIT"),
    ),
    paths(
        health,
        get_rates,
        list_rates,
        update_rates,
        convert_price,
        cart_totals,
        update_quantity,
        remove_item,
    ),
    components(
        schemas(
            RateSet,
            UpdateRatesRequest,
            UpdateRatesResponse,
            ConvertPriceRequest,
            ConvertPriceResponse,
            CartLineItem,
            CartTotals,
            CartTotalsRequest,
            UpdateQuantityRequest,
            RemoveItemRequest,
            ConvertedTotals,
            CartQuote,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "currency", description = "Exchange rates and price conversion"),
        (name = "cart", description = "Cart pricing pipeline"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();

        for path in [
            "/health",
            "/currency/rates",
            "/currency/rates/all",
            "/currency/rates/update",
            "/currency/convert",
            "/cart/totals",
            "/cart/quantity",
            "/cart/remove",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
