//! # Printer Driver Seam
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReceiptPrinter                                                        │
//! │       │  open(addr)                                                     │
//! │       ▼                                                                 │
//! │  dyn PrinterDriver ───────┬── NetworkDriver  (TCP, ESC/POS bytes)       │
//! │       │                   └── SpoolDriver    (in memory, logs text)     │
//! │       ▼                                                                 │
//! │  Box<dyn PrinterConnection>                                            │
//! │       ├── emit(&[PrintDirective])   one call per job                   │
//! │       └── close()                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `open` is the only place a job can fail without side effects. Once it
//! returns, the device has been reached.

use async_trait::async_trait;
use tally_core::PrintDirective;

use crate::address::PrinterAddress;
use crate::error::PrinterResult;

/// Opens connections to a printer.
#[async_trait]
pub trait PrinterDriver: Send + Sync {
    /// Connects to the printer at `addr`.
    ///
    /// ## Errors
    /// `PrinterError::Connection` or `PrinterError::Timeout` when the device
    /// cannot be reached. Nothing has been printed in that case.
    async fn open(&self, addr: &PrinterAddress) -> PrinterResult<Box<dyn PrinterConnection>>;

    /// Short name for logs (`network`, `spool`).
    fn name(&self) -> &'static str;
}

/// An open printer connection.
#[async_trait]
pub trait PrinterConnection: Send {
    /// Sends one job's directives, in order.
    async fn emit(&mut self, directives: &[PrintDirective]) -> PrinterResult<()>;

    /// Flushes and releases the connection.
    async fn close(&mut self) -> PrinterResult<()>;
}
