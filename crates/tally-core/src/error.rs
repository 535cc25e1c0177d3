//! # Domain Errors
//!
//! ```text
//! ValidationError ──► CoreError ──► ApiError (400)
//!   bad request        cart misuse
//!   payloads
//! ```
//!
//! Store and printer failures have their own types in `tally-db` and
//! `tally-printer`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart operation named a product that has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(i64),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// A request payload that cannot be accepted as is.
///
/// Raised before anything touches the store or the printer.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// An empty cart or an empty receipt.
    #[error("{field} must contain at least one item")]
    Empty { field: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
