//! # Cart
//!
//! The cashier's cart: products picked from the grid, each with a quantity.
//!
//! The cart only ever lives on the client. This module is the reference model
//! of its rules and builds the two payloads a checkout sends to the server:
//! the sale commit body and the receipt print body.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI Action             Cart Method          State Change                │
//! │  ─────────             ───────────          ────────────                │
//! │  Click Product ──────► add()          ───► qty += 1 (or new line)      │
//! │  Click "+" ──────────► increment()    ───► qty += 1                    │
//! │  Click "-" ──────────► decrement()    ───► qty -= 1, never below 1     │
//! │  Click Remove ───────► remove()       ───► line removed                │
//! │  Click Clear ────────► clear()        ───► empty                       │
//! │  Click Checkout ─────► checkout()     ───► NewSale for POST /api/sales │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding the same product bumps quantity)
//! - Quantity is at least 1
//! - Quantity is NOT capped by stock

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::receipt::ReceiptRequest;
use crate::types::{NewSale, Product, SaleLine, SaleLineDetail};
use crate::validation::{validate_computed_amount, validate_quantity};

/// An item in the cart.
///
/// The product is copied in when added, so the unit price shown in the cart
/// is the one that gets committed even if the catalog is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// Unit price × quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.product.price.checked_multiply(self.quantity)
    }
}

/// The cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a product, creating the line if needed.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.find_mut(product.id) {
            item.quantity += 1;
            return;
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
    }

    /// Adds one unit to an existing line.
    pub fn increment(&mut self, product_id: i64) -> CoreResult<()> {
        let item = self
            .find_mut(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        item.quantity += 1;
        Ok(())
    }

    /// Removes one unit from an existing line. Stops at 1.
    pub fn decrement(&mut self, product_id: i64) -> CoreResult<()> {
        let item = self
            .find_mut(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        item.quantity = (item.quantity - 1).max(1);
        Ok(())
    }

    /// Sets the quantity of an existing line.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let item = self
            .find_mut(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removes a line.
    pub fn remove(&mut self, product_id: i64) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id))
        } else {
            Ok(())
        }
    }

    /// Discards every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of all line totals.
    ///
    /// Fails when a line or the sum does not fit in cents.
    pub fn total(&self) -> CoreResult<Money> {
        let total = self
            .items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.line_total()?));
        Ok(validate_computed_amount("items", total)?)
    }

    /// Builds the sale commit payload.
    ///
    /// Fails on an empty cart or a total that overflows.
    pub fn checkout(&self) -> CoreResult<NewSale> {
        if self.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            }
            .into());
        }

        Ok(NewSale {
            total: self.total()?,
            items: self
                .items
                .iter()
                .map(|i| SaleLine {
                    product_id: i.product.id,
                    quantity: i.quantity,
                    price: i.product.price,
                })
                .collect(),
        })
    }

    /// Builds the receipt payload for a sale just committed from this cart.
    pub fn receipt(&self, sale_id: i64) -> CoreResult<ReceiptRequest> {
        Ok(ReceiptRequest {
            sale_id,
            total: self.total()?,
            items: self
                .items
                .iter()
                .map(|i| SaleLineDetail {
                    name: i.product.name.clone(),
                    quantity: i.quantity,
                    price: i.product.price,
                })
                .collect(),
        })
    }

    fn find_mut(&mut self, product_id: i64) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: Money::from_cents(cents),
            stock,
            barcode: None,
        }
    }

    #[test]
    fn test_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let water = product(1, 250, 500);

        cart.add(&water);
        cart.add(&water);
        cart.add(&water);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total().unwrap(), Money::from_cents(750));
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut cart = Cart::new();
        cart.add(&product(1, 250, 500));

        cart.decrement(1).unwrap();
        cart.decrement(1).unwrap();

        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_quantity_not_capped_by_stock() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 2));

        cart.set_quantity(1, 50).unwrap();

        assert_eq!(cart.items()[0].quantity, 50);
    }

    #[test]
    fn test_set_quantity_rejects_zero() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 2));

        assert!(cart.set_quantity(1, 0).is_err());
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_missing_line_errors() {
        let mut cart = Cart::new();
        assert!(matches!(cart.increment(9), Err(CoreError::NotInCart(9))));
        assert!(matches!(cart.remove(9), Err(CoreError::NotInCart(9))));
    }

    #[test]
    fn test_checkout_builds_sale() {
        let mut cart = Cart::new();
        let water = product(1, 250, 500);
        let bread = product(2, 120, 30);

        cart.add(&water);
        cart.set_quantity(1, 3).unwrap();
        cart.add(&bread);

        let sale = cart.checkout().unwrap();
        assert_eq!(sale.total, Money::from_cents(870));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].product_id, 1);
        assert_eq!(sale.items[0].quantity, 3);
        assert_eq!(sale.items[0].price, Money::from_cents(250));
        assert!(sale.is_consistent());
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let cart = Cart::new();
        assert!(matches!(cart.checkout(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_checkout_overflowing_total_fails() {
        let mut cart = Cart::new();
        cart.add(&product(1, 250, 500));
        cart.set_quantity(1, i64::MAX / 2).unwrap();

        assert!(matches!(
            cart.checkout(),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.receipt(1).is_err());
    }

    #[test]
    fn test_receipt_and_clear() {
        let mut cart = Cart::new();
        cart.add(&product(1, 250, 500));

        let receipt = cart.receipt(41).unwrap();
        assert_eq!(receipt.sale_id, 41);
        assert_eq!(receipt.items[0].name, "Product 1");

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().unwrap().is_zero());
    }
}
