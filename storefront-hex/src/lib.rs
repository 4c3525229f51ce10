//! # Storefront Hex
//!
//! Application service layer and HTTP adapter for the storefront pricing service.
//!
//! ## Architecture
//!
//! - `service/` - Application services (currency rates, conversion, cart pricing)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served at `/api-docs/openapi.json`
//!
//! `CurrencyService` is generic over `R: RateRepository`, allowing
//! different rate store implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::{CartService, CurrencyService};
