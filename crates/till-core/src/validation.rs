//! # Validation Module
//!
//! Input validation for the sale-creation workflow.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum Json extractor)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, quantities, prices                               │
//! │  └── total == subtotal - discount + tax                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sale transaction (till-db)                                   │
//! │  ├── Product exists                                                    │
//! │  └── Stock never goes negative                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite constraints (CHECK stock >= 0, foreign keys)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::NewSale;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_INVOICE_LEN: usize = 64;
const MAX_NOTES_LEN: usize = 2000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_required;
///
/// assert!(validate_required("customer_name", "Ada", 200).is_ok());
/// assert!(validate_required("customer_name", "   ", 200).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional customer email. Empty is treated as absent.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "customer_email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an amount in cents.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_AMOUNT_CENTS
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("price", 1099).is_ok());
/// assert!(validate_amount_cents("price", 0).is_ok());     // Free item
/// assert!(validate_amount_cents("price", -100).is_err());
/// assert!(validate_amount_cents("price", i64::MAX).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Validation
// =============================================================================

/// Validates a sale request before its unit of work opens.
///
/// Checks metadata, every line item, the amounts, and the
/// `total == subtotal - discount + tax` identity. Line-item totals are not
/// compared against `subtotal`; the caller owns pricing.
pub fn validate_new_sale(sale: &NewSale) -> CoreResult<()> {
    validate_required("customer_name", &sale.customer_name, MAX_NAME_LEN)?;
    validate_required("invoice_number", &sale.invoice_number, MAX_INVOICE_LEN)?;
    validate_email(sale.customer_email.as_deref())?;

    if let Some(notes) = &sale.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: MAX_NOTES_LEN,
            }
            .into());
        }
    }

    if sale.products.is_empty() {
        return Err(ValidationError::Required {
            field: "products".to_string(),
        }
        .into());
    }

    if sale.products.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "products".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        }
        .into());
    }

    for line in &sale.products {
        validate_required("product", &line.product, 64)?;
        validate_quantity(line.quantity)?;
        validate_amount_cents("price", line.price_cents)?;
    }

    validate_amount_cents("subtotal", sale.subtotal_cents)?;
    validate_amount_cents("discount_amount", sale.discount_amount_cents)?;
    validate_amount_cents("tax_amount", sale.tax_amount_cents)?;
    validate_amount_cents("total", sale.total_cents)?;

    if sale.expected_total() != Some(Money::from_cents(sale.total_cents)) {
        return Err(CoreError::InvalidTotal {
            subtotal: sale.subtotal_cents,
            discount: sale.discount_amount_cents,
            tax: sale.tax_amount_cents,
            total: sale.total_cents,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewSaleLine;
    use chrono::Utc;

    fn valid_sale() -> NewSale {
        NewSale {
            customer_name: "Ada Lovelace".to_string(),
            customer_email: Some("ada@example.com".to_string()),
            customer_phone: None,
            invoice_number: "INV-0001".to_string(),
            date: Utc::now(),
            notes: None,
            products: vec![NewSaleLine {
                product: "p-1".to_string(),
                quantity: 4,
                price_cents: 1000,
            }],
            subtotal_cents: 4000,
            discount_amount_cents: 500,
            tax_amount_cents: 750,
            total_cents: 4250,
        }
    }

    #[test]
    fn test_valid_sale_passes() {
        assert!(validate_new_sale(&valid_sale()).is_ok());
    }

    #[test]
    fn test_required_fields() {
        let mut sale = valid_sale();
        sale.customer_name = "  ".to_string();
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::Required { field })) if field == "customer_name"
        ));

        let mut sale = valid_sale();
        sale.products.clear();
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::Required { field })) if field == "products"
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_line_quantity_must_be_positive() {
        let mut sale = valid_sale();
        sale.products[0].quantity = 0;
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut sale = valid_sale();
        sale.products[0].price_cents = -1;
        assert!(validate_new_sale(&sale).is_err());

        let mut sale = valid_sale();
        sale.discount_amount_cents = -500;
        sale.total_cents = 5250;
        assert!(validate_new_sale(&sale).is_err());
    }

    #[test]
    fn test_total_identity_enforced() {
        let mut sale = valid_sale();
        sale.total_cents = 4251;
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::InvalidTotal { total: 4251, .. })
        ));
    }

    #[test]
    fn test_oversized_amounts_rejected_without_overflow() {
        let mut sale = valid_sale();
        sale.subtotal_cents = i64::MAX;
        sale.discount_amount_cents = 0;
        sale.tax_amount_cents = 1;
        sale.total_cents = 0;
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::OutOfRange { field, .. })) if field == "subtotal"
        ));

        let mut sale = valid_sale();
        sale.products[0].price_cents = i64::MAX;
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::OutOfRange { field, .. })) if field == "price"
        ));
    }

    #[test]
    fn test_largest_amounts_still_validate() {
        let mut sale = valid_sale();
        sale.subtotal_cents = MAX_AMOUNT_CENTS;
        sale.discount_amount_cents = 0;
        sale.tax_amount_cents = 0;
        sale.total_cents = MAX_AMOUNT_CENTS;
        assert!(validate_new_sale(&sale).is_ok());

        sale.tax_amount_cents = MAX_AMOUNT_CENTS;
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::InvalidTotal { .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("")).is_ok());
        assert!(validate_email(Some("a@b.co")).is_ok());
        assert!(validate_email(Some("not-an-email")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
    }

    #[test]
    fn test_too_many_lines() {
        let mut sale = valid_sale();
        let line = sale.products[0].clone();
        sale.products = vec![line; MAX_SALE_LINES + 1];
        assert!(matches!(
            validate_new_sale(&sale),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }
}
