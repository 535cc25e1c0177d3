//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product_id     │       │
//! │  │  name           │   │  total          │   │  quantity       │       │
//! │  │  price          │   │  created_at     │   │  price (frozen) │       │
//! │  │  stock          │   └─────────────────┘   └─────────────────┘       │
//! │  │  barcode        │                                                    │
//! │  └─────────────────┘   NewSale = total + Vec<SaleLine>  (commit input)  │
//! │                        SaleDetail = Sale + Vec<SaleLineDetail> (read)   │
//! │                        SaleSummary = Sale + item_count (history list)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale line carries the unit price captured at checkout. It is never
//! joined back to the product's current price, so later price changes do not
//! rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier assigned by the store.
    pub id: i64,

    /// Display name shown in the grid and on the receipt.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units on hand. Can go negative after oversold sales.
    pub stock: i64,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,
}

impl Product {
    /// Whether the UI should let the cashier add this product.
    ///
    /// Zero stock disables the product in the grid; it is not a floor
    /// enforced when a sale is committed.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// A product that has not been stored yet (seed data, imports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub barcode: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Money, stock: i64) -> Self {
        NewProduct {
            name: name.into(),
            price,
            stock,
            barcode: None,
        }
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

/// A sale as listed in the history view: header plus number of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: i64,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

// =============================================================================
// Sale Lines
// =============================================================================

/// One line of a sale as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub price: Money,
}

impl SaleLine {
    /// Unit price × quantity, `None` when it does not fit in cents.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply(self.quantity)
    }
}

/// Input of a sale commit: the caller's total and the ordered lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub total: Money,
    pub items: Vec<SaleLine>,
}

impl NewSale {
    /// Sum of all line totals, `None` if any line or the sum overflows.
    pub fn line_sum(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line.line_total()?))
    }

    /// Whether the supplied total equals the sum of the lines.
    ///
    /// The total is stored as given either way.
    pub fn is_consistent(&self) -> bool {
        self.line_sum() == Some(self.total)
    }
}

/// A persisted sale line joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDetail {
    pub name: String,
    pub quantity: i64,
    /// Unit price captured at sale time.
    pub price: Money,
}

impl SaleLineDetail {
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply(self.quantity)
    }
}

/// A sale with all of its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub id: i64,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub items: Vec<SaleLineDetail>,
}

impl SaleDetail {
    pub fn from_parts(sale: Sale, items: Vec<SaleLineDetail>) -> Self {
        SaleDetail {
            id: sale.id,
            total: sale.total,
            created_at: sale.created_at,
            items,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
