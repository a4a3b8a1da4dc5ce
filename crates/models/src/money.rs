//! Decimal money helpers for `DECIMAL(10,2)` prices.

use rust_decimal::Decimal;
use serde::Serializer;

use crate::errors::ModelError;

/// Largest value representable in `DECIMAL(10,2)`.
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Validate a price and bring it to scale 2.
///
/// Rejects non-positive values and values with more than two significant
/// fractional digits (`49.990` is accepted, `49.999` is not).
pub fn normalize_price(price: Decimal) -> Result<Decimal, ModelError> {
    if price <= Decimal::ZERO {
        return Err(ModelError::Validation("Price must be greater than zero".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ModelError::Validation("Price must have at most two decimal places".into()));
    }
    if price > max_price() {
        return Err(ModelError::Validation("Price is too large".into()));
    }
    let mut p = price;
    p.rescale(2);
    Ok(p)
}

/// Serialize with exactly two fractional digits, as a string.
pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    let mut v = *value;
    v.rescale(2);
    s.collect_str(&v)
}
