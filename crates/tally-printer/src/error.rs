//! # Printer Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Address            Transport                 Device                    │
//! │  ───────            ─────────                 ──────                    │
//! │  InvalidAddress     Connection / Timeout      Write                     │
//! │                                                                         │
//! │  All map to 502 at the HTTP layer. Nothing retries automatically;      │
//! │  the cashier re-issues the print from the history view.                │
//! │                                                                         │
//! │  Layout (a line total that overflows) is the caller's fault: 400.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for printer operations.
pub type PrinterResult<T> = Result<T, PrinterError>;

#[derive(Debug, Error)]
pub enum PrinterError {
    /// The configured printer address could not be parsed.
    #[error("Invalid printer address: {0}")]
    InvalidAddress(String),

    /// The printer refused or dropped the connection before anything was sent.
    #[error("Could not connect to printer at {addr}: {reason}")]
    Connection { addr: String, reason: String },

    /// Connect or write took longer than the configured timeout.
    #[error("Printer at {addr} timed out after {secs} seconds")]
    Timeout { addr: String, secs: u64 },

    /// The connection broke while a job was being sent.
    #[error("Failed to send job to printer: {0}")]
    Write(String),

    /// The receipt could not be laid out. Nothing was sent.
    #[error("Receipt cannot be printed: {0}")]
    Layout(#[from] tally_core::ValidationError),
}

impl PrinterError {
    pub fn connection(addr: impl ToString, reason: impl ToString) -> Self {
        PrinterError::Connection {
            addr: addr.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when nothing reached the device.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            PrinterError::Connection { .. } | PrinterError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for PrinterError {
    fn from(err: std::io::Error) -> Self {
        PrinterError::Write(err.to_string())
    }
}
