//! Domain models for the storefront pricing service.

pub mod cart;
pub mod rates;

pub use cart::{Cart, CartLineItem, CartTotals, PricingPolicy, compute_totals};
pub use rates::{RateSet, coerce_number, normalize_code};
