//! Built-in Currency Catalogue and Default Rate Table
//!
//! The storefront prices its catalogue in a single base currency (INR) and
//! converts on display using multiplicative factors. This crate holds the
//! currencies the storefront knows about out of the box, together with the
//! default factor table that seeds an empty rate store.
//!
//! Currencies are declared once through the `define_currencies!` macro, which
//! generates the `CurrencyCode` enum and its lookup tables.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation with the factor that
//! converts one unit of INR into the new currency:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     JPY => ("JPY", "¥", 1.78),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{CurrencyCode, apply_rate, default_table_for};
//!
//! let rates = default_table_for("INR");
//! assert_eq!(rates.get("INR"), Some(&1.0));
//!
//! let factor = CurrencyCode::USD.default_factor();
//! let dollars = apply_rate(1000.0, factor);
//! assert!((dollars - 12.0).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the catalogue, CurrencyCode enum, and lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the built-in currencies.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     CurrencyName => ("CODE", "SYMBOL", factor_from_inr),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $factor:expr)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// Factor converting one unit of INR into this currency.
            pub fn default_factor(&self) -> f64 {
                match self {
                    $(CurrencyCode::$name => $factor),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }

            /// Looks up a catalogue entry by code, ignoring case.
            pub fn lookup(code: &str) -> Option<CurrencyCode> {
                match code.trim().to_uppercase().as_str() {
                    $($code => Some(CurrencyCode::$name),)*
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                CurrencyCode::lookup(s).ok_or_else(|| format!("Unknown currency: {}", s))
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - factors are relative to one unit of INR
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    INR => ("INR", "₹", 1.0),
    USD => ("USD", "$", 0.012),
    EUR => ("EUR", "€", 0.011),
    GBP => ("GBP", "£", 0.0095),
    AED => ("AED", "د.إ", 0.044),
}

/// The currency the default table is expressed against.
pub const DEFAULT_BASE: CurrencyCode = CurrencyCode::INR;

// ─────────────────────────────────────────────────────────────────────────────
// Default tables
// ─────────────────────────────────────────────────────────────────────────────

/// The hardcoded default table, keyed by currency code, relative to INR.
pub fn default_table() -> BTreeMap<String, f64> {
    CurrencyCode::all()
        .iter()
        .map(|c| (c.code().to_string(), c.default_factor()))
        .collect()
}

/// The default table rebased so that `base` maps to exactly 1.
///
/// A base outside the catalogue yields a single-entry table `{ base: 1 }`.
pub fn default_table_for(base: &str) -> BTreeMap<String, f64> {
    let base = base.trim().to_uppercase();

    let Some(pivot) = CurrencyCode::lookup(&base) else {
        return BTreeMap::from([(base, 1.0)]);
    };

    let pivot_factor = pivot.default_factor();
    let mut table: BTreeMap<String, f64> = CurrencyCode::all()
        .iter()
        .map(|c| (c.code().to_string(), c.default_factor() / pivot_factor))
        .collect();
    table.insert(base, 1.0);
    table
}

/// Multiplies a price by a conversion factor.
pub fn apply_rate(price: f64, factor: f64) -> f64 {
    price * factor
}

/// Symbol for a code, if it is one of the built-in currencies.
pub fn symbol_for(code: &str) -> Option<&'static str> {
    CurrencyCode::lookup(code).map(|c| c.symbol())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
