//! Currency rate sets keyed by base currency.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Trims and upper-cases a currency code.
///
/// Codes must be non-empty and ASCII alphanumeric.
pub fn normalize_code(code: &str) -> Result<String, DomainError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DomainError::ValidationError(
            "Currency code cannot be empty".into(),
        ));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::ValidationError(format!(
            "Invalid currency code: {}",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Reads a JSON number or a numeric string as a finite `f64`.
pub fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Exchange factors relative to a base currency.
///
/// `rates[base]` is always exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateSet {
    /// Base currency code
    #[schema(example = "INR")]
    pub base: String,
    /// Currency code -> multiplicative factor relative to the base
    #[schema(example = json!({"INR": 1.0, "USD": 0.012, "EUR": 0.011}))]
    pub rates: BTreeMap<String, f64>,
    /// When this set was last written
    pub last_updated: DateTime<Utc>,
}

impl RateSet {
    /// Builds a fresh rate set stamped with the current time.
    ///
    /// The base entry is overwritten with 1 whatever the caller supplied;
    /// every other factor must be finite and positive.
    pub fn new(base: &str, rates: BTreeMap<String, f64>) -> Result<Self, DomainError> {
        let base = normalize_code(base)?;

        let mut normalized = BTreeMap::new();
        for (code, factor) in rates {
            let code = normalize_code(&code)?;
            if code == base {
                continue;
            }
            if !factor.is_finite() || factor <= 0.0 {
                return Err(DomainError::InvalidRate {
                    code,
                    reason: format!("factor must be a positive number, got {}", factor),
                });
            }
            normalized.insert(code, factor);
        }
        normalized.insert(base.clone(), 1.0);

        Ok(Self {
            base,
            rates: normalized,
            last_updated: Utc::now(),
        })
    }

    /// The built-in default table, rebased onto `base`.
    pub fn defaults(base: &str) -> Result<Self, DomainError> {
        let base = normalize_code(base)?;
        let rates = exchange_rates::default_table_for(&base);
        Ok(Self {
            base,
            rates,
            last_updated: Utc::now(),
        })
    }

    /// Reassembles a rate set read back from storage.
    pub fn from_parts(
        base: String,
        rates: BTreeMap<String, f64>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            base,
            rates,
            last_updated,
        }
    }

    /// Factor for `code`, if present.
    pub fn factor(&self, code: &str) -> Option<f64> {
        let code = normalize_code(code).ok()?;
        self.rates.get(&code).copied()
    }

    /// Converts a price expressed in the base currency into `target`.
    pub fn convert(&self, price: f64, target: &str) -> Result<f64, DomainError> {
        let target = normalize_code(target)?;
        if target == self.base {
            return Ok(price);
        }
        let factor = self
            .rates
            .get(&target)
            .copied()
            .ok_or(DomainError::UnsupportedCurrency(target))?;
        Ok(exchange_rates::apply_rate(price, factor))
    }

    /// Coerces an admin payload into raw factors.
    ///
    /// The payload must be a JSON object whose values are numbers or numeric
    /// strings.
    pub fn coerce_factors(
        value: &serde_json::Value,
    ) -> Result<BTreeMap<String, f64>, DomainError> {
        let object = value.as_object().ok_or_else(|| {
            DomainError::ValidationError("Rates must be a non-null object".into())
        })?;

        object
            .iter()
            .map(|(code, raw)| {
                coerce_number(raw)
                    .map(|factor| (code.clone(), factor))
                    .ok_or_else(|| DomainError::InvalidRate {
                        code: code.clone(),
                        reason: format!("not a number: {}", raw),
                    })
            })
            .collect()
    }
}
