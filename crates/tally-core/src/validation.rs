//! # Validation Module
//!
//! Input validation utilities for Tally POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser UI                                                   │
//! │  ├── Quantity never below 1, zero-stock products disabled              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: request shape rules                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock sufficiency and total consistency are deliberately NOT checked here:
//! a sale may drive stock negative and the caller's total is stored as given.

use crate::error::ValidationError;
use crate::receipt::ReceiptRequest;
use crate::types::{NewProduct, NewSale};
use crate::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - No upper bound: stock is not consulted
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary amount that must not be negative (prices, totals).
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Checks that a computed amount fit in `i64` cents.
///
/// Line totals and sums come back as `None` from the checked money
/// arithmetic when a quantity is absurdly large.
pub fn validate_computed_amount(field: &str, amount: Option<Money>) -> ValidationResult<Money> {
    amount.ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    })
}

/// Validates a stored identifier (SQLite rowids start at 1).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a checkout before it reaches the sale commit.
///
/// ## Rules
/// - At least one line (an empty cart is rejected)
/// - Every line references a positive product id
/// - Every quantity is positive, every unit price non-negative
/// - Every line total and their sum fit in `i64` cents
/// - The total is non-negative
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    if sale.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    validate_amount("total", sale.total)?;

    for line in &sale.items {
        validate_id("productId", line.product_id)?;
        validate_quantity(line.quantity)?;
        validate_amount("price", line.price)?;
        validate_computed_amount("quantity", line.line_total())?;
    }

    validate_computed_amount("items", sale.line_sum())?;

    Ok(())
}

/// Validates a caller-supplied receipt before it is sent to the printer.
pub fn validate_receipt_request(receipt: &ReceiptRequest) -> ValidationResult<()> {
    validate_id("saleId", receipt.sale_id)?;

    if receipt.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for item in &receipt.items {
        if item.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
        validate_computed_amount("quantity", item.line_total())?;
    }

    Ok(())
}

/// Validates a product before it is inserted into the catalog.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_amount("price", product.price)?;

    if let Some(barcode) = &product.barcode {
        if barcode.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "barcode".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SaleLine, SaleLineDetail};

    fn sale(lines: Vec<(i64, i64, i64)>) -> NewSale {
        let items: Vec<SaleLine> = lines
            .into_iter()
            .map(|(product_id, quantity, cents)| SaleLine {
                product_id,
                quantity,
                price: Money::from_cents(cents),
            })
            .collect();
        let total = Money::checked_sum(items.iter().filter_map(SaleLine::line_total))
            .unwrap_or_default();
        NewSale { total, items }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Agua 500ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_new_sale() {
        assert!(validate_new_sale(&sale(vec![(1, 3, 250)])).is_ok());
        // Free items are allowed
        assert!(validate_new_sale(&sale(vec![(1, 1, 0)])).is_ok());
    }

    #[test]
    fn test_validate_new_sale_rejects_empty_cart() {
        let err = validate_new_sale(&sale(vec![])).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_validate_new_sale_rejects_bad_lines() {
        assert!(validate_new_sale(&sale(vec![(1, 0, 250)])).is_err());
        assert!(validate_new_sale(&sale(vec![(0, 1, 250)])).is_err());
        assert!(validate_new_sale(&sale(vec![(1, 1, -5)])).is_err());
    }

    #[test]
    fn test_validate_new_sale_rejects_overflowing_totals() {
        let err = validate_new_sale(&sale(vec![(1, 100_000_000_000_000_000, 250)])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, min: 0, max: i64::MAX } if field == "quantity"
        ));

        // each line fits on its own, the sum does not
        let err = validate_new_sale(&sale(vec![(1, 1, i64::MAX), (2, 1, 1)])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, .. } if field == "items"
        ));
    }

    #[test]
    fn test_validate_new_sale_accepts_inconsistent_total() {
        let mut checkout = sale(vec![(1, 3, 250)]);
        checkout.total = Money::from_cents(1);
        assert!(validate_new_sale(&checkout).is_ok());
    }

    #[test]
    fn test_validate_receipt_request() {
        let receipt = ReceiptRequest {
            sale_id: 12,
            total: Money::from_cents(250),
            items: vec![SaleLineDetail {
                name: "Agua 500ml".to_string(),
                quantity: 1,
                price: Money::from_cents(250),
            }],
        };
        assert!(validate_receipt_request(&receipt).is_ok());

        let mut no_id = receipt.clone();
        no_id.sale_id = 0;
        assert!(validate_receipt_request(&no_id).is_err());

        let mut huge = receipt.clone();
        huge.items[0].quantity = 100_000_000_000_000_000;
        assert!(matches!(
            validate_receipt_request(&huge),
            Err(ValidationError::OutOfRange { .. })
        ));

        let mut no_items = receipt;
        no_items.items.clear();
        assert!(validate_receipt_request(&no_items).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct::new("Pan", Money::from_cents(100), 10);
        assert!(validate_new_product(&product).is_ok());
        assert!(validate_new_product(&product.clone().with_barcode(" ")).is_err());

        let negative = NewProduct::new("Pan", Money::from_cents(-1), 10);
        assert!(validate_new_product(&negative).is_err());
    }
}
