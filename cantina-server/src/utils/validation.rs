//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are
//! applied here before any write.

use crate::utils::AppError;
use shared::Money;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, product snapshot names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and other free text (order notes, flavor)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Monetary / quantity bounds ──────────────────────────────────────

/// Maximum allowed price per item (R$1,000,000)
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i64 = 9999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an optional string against a length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a unit price is non-negative and within bounds.
pub fn validate_price(price: Money, field: &str) -> Result<(), AppError> {
    if price.is_negative() {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {price}"
        )));
    }
    if price.cents() > MAX_PRICE_CENTS {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed, got {price}"
        )));
    }
    Ok(())
}

/// Validate an item quantity is positive and within bounds.
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_required_text() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Ana", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn rejects_out_of_bound_quantity() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(10_000).is_err());
        assert!(validate_quantity(1).is_ok());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(validate_price(Money::from_cents(-1), "unit_price").is_err());
        assert!(validate_price(Money::from_cents(1100), "unit_price").is_ok());
    }
}
