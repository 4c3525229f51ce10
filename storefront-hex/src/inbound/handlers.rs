//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use storefront_types::{
    ApiResponse, AppError, CartQuote, CartTotalsRequest, ConvertPriceRequest,
    ConvertPriceResponse, RateRepository, RatesQuery, RemoveItemRequest, UpdateQuantityRequest,
    UpdateRatesRequest, UpdateRatesResponse, domain::coerce_number, normalize_code,
};

use crate::{CartService, CurrencyService};

/// Application state shared across handlers.
pub struct AppState<R: RateRepository> {
    pub currency: CurrencyService<R>,
    pub cart: CartService,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnsupportedCurrency(code) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported currency: {}", code),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "success": false,
            "message": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency
// ─────────────────────────────────────────────────────────────────────────────

/// Get the rate set for a base currency (defaults seeded on first read).
#[tracing::instrument(skip(state))]
pub async fn get_rates<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<RatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.currency.get_rates(query.base.as_deref()).await?;
    Ok(Json(ApiResponse::ok(rates)))
}

/// List every stored rate set.
#[tracing::instrument(skip(state))]
pub async fn list_rates<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let sets = state.currency.list_rates().await?;
    Ok(Json(ApiResponse::ok(sets)))
}

/// Replace the rate set for a base currency.
#[tracing::instrument(skip(state, req), fields(base = ?req.base))]
pub async fn update_rates<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<UpdateRatesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .currency
        .create_or_update_rates(&req.rates, req.base.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(UpdateRatesResponse {
        base: stored.base,
        last_updated: stored.last_updated,
    })))
}

/// Convert a single price into a target currency.
#[tracing::instrument(skip(state, req), fields(target = ?req.target_currency))]
pub async fn convert_price<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<ConvertPriceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let price = coerce_number(&req.price)
        .ok_or_else(|| AppError::BadRequest("Price must be a number".into()))?;

    let target = req
        .target_currency
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Target currency is required".into()))?;

    let base = state
        .currency
        .resolve_base(req.base_currency.as_deref())?;
    let target = normalize_code(target).map_err(AppError::from)?;
    let converted = state
        .currency
        .convert_price(price, &target, Some(&base))
        .await?;

    Ok(Json(ApiResponse::ok(ConvertPriceResponse {
        original_price: price,
        original_currency: base,
        converted_price: converted,
        target_currency: target,
    })))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart
// ─────────────────────────────────────────────────────────────────────────────

/// Price a cart as received.
#[tracing::instrument(skip(state, req), fields(lines = req.items.len()))]
pub async fn cart_totals<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<CartTotalsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state.cart.quote(req.items)?;
    let quote = with_conversion(&state, quote, req.currency.as_deref()).await?;
    Ok(Json(ApiResponse::ok(quote)))
}

/// Change one line's quantity and reprice the cart.
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id, quantity = req.quantity))]
pub async fn update_quantity<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state.cart.update_quantity(
        req.items,
        &req.product_id,
        req.variant.as_deref(),
        req.quantity,
    )?;
    let quote = with_conversion(&state, quote, req.currency.as_deref()).await?;
    Ok(Json(ApiResponse::ok(quote)))
}

/// Remove one line and reprice the cart.
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id))]
pub async fn remove_item<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<RemoveItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state
        .cart
        .remove_item(req.items, &req.product_id, req.variant.as_deref())?;
    let quote = with_conversion(&state, quote, req.currency.as_deref()).await?;
    Ok(Json(ApiResponse::ok(quote)))
}

/// Attaches display-currency totals when a currency was requested.
async fn with_conversion<R: RateRepository>(
    state: &AppState<R>,
    mut quote: CartQuote,
    currency: Option<&str>,
) -> Result<CartQuote, AppError> {
    if let Some(code) = currency.filter(|c| !c.trim().is_empty()) {
        let converted = state.currency.convert_totals(quote.totals(), code).await?;
        quote.converted = Some(converted);
    }
    Ok(quote)
}
