//! # Storefront Client SDK
//!
//! A typed Rust client for the storefront pricing API.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use storefront_types::{
    ApiResponse, CartLineItem, CartQuote, CartTotalsRequest, ConvertPriceRequest,
    ConvertPriceResponse, RateSet, UpdateRatesRequest, UpdateRatesResponse,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storefront API client.
pub struct StorefrontClient {
    base_url: String,
    http: Client,
}

impl StorefrontClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Gets the rate set for `base` (server default when `None`).
    pub async fn get_rates(&self, base: Option<&str>) -> Result<RateSet, ClientError> {
        let mut req = self.http.get(format!("{}/currency/rates", self.base_url));
        if let Some(base) = base {
            req = req.query(&[("base", base)]);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    /// Lists every stored rate set.
    pub async fn list_rates(&self) -> Result<Vec<RateSet>, ClientError> {
        self.get("/currency/rates/all").await
    }

    /// Replaces the rate set for `base` with `rates`.
    pub async fn update_rates(
        &self,
        rates: BTreeMap<String, f64>,
        base: Option<String>,
    ) -> Result<UpdateRatesResponse, ClientError> {
        let req = UpdateRatesRequest {
            rates: serde_json::to_value(rates)?,
            base,
        };
        self.post("/currency/rates/update", &req).await
    }

    /// Converts `price` from `base` (server default when `None`) into `target`.
    pub async fn convert_price(
        &self,
        price: f64,
        target: &str,
        base: Option<String>,
    ) -> Result<ConvertPriceResponse, ClientError> {
        let req = ConvertPriceRequest {
            price: serde_json::json!(price),
            target_currency: Some(target.to_string()),
            base_currency: base,
        };
        self.post("/currency/convert", &req).await
    }

    /// Prices a cart, optionally with totals converted into `currency`.
    pub async fn cart_totals(
        &self,
        items: Vec<CartLineItem>,
        currency: Option<String>,
    ) -> Result<CartQuote, ClientError> {
        let req = CartTotalsRequest { items, currency };
        self.post("/cart/totals", &req).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Unwraps the `{ success, data }` envelope or surfaces the error message.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
            Ok(envelope.data)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Pulls `message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
