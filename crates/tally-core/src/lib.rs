//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate contains the domain model of Tally POS as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │    Product Grid ──► Cart ──► Checkout ──► Sales History         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-server (axum)                          │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────┐  ┌────────────▼───────────────┐   │
//! │  │  tally-db (SQLite)              │  │  tally-printer (ESC/POS)   │   │
//! │  └──────────────┬──────────────────┘  └────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────────────────▼───────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │   types • money • cart • validation • receipt                   │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, sale lines)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Client cart model and checkout payload builder
//! - [`receipt`] - Receipt layout as an ordered list of print directives
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(250); // $2.50
//! let line_total = price.checked_multiply(3).expect("fits in cents");
//! assert_eq!(line_total.cents(), 750);
//! assert_eq!(line_total.to_string(), "$7.50");
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use receipt::{Alignment, MerchantInfo, PrintDirective, ReceiptFormatter, TableCell};
pub use types::*;

/// Width of the ticket number printed on receipts (`000042`).
pub const TICKET_NUMBER_WIDTH: usize = 6;

/// Maximum characters of a product name shown in the receipt item table.
pub const RECEIPT_NAME_WIDTH: usize = 15;
