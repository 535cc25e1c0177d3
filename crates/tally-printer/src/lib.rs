//! # tally-printer: Receipt Printer Access
//!
//! Sends the directives laid out by `tally-core` to a thermal printer.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /api/print ──► ReceiptPrinter ──► PrinterDriver ──► device        │
//! │  POST /api/drawer        │                   │                          │
//! │                          │                   ├── NetworkDriver          │
//! │                  ReceiptFormatter            │     TCP :9100, ESC/POS   │
//! │                  (tally-core)                └── SpoolDriver            │
//! │                                                    memory + log         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`address`] - `host[:port]` parsing
//! - [`driver`] - Driver and connection traits
//! - [`escpos`] - Directive to byte encoding
//! - [`network`] - TCP driver
//! - [`spool`] - In-memory driver
//! - [`printer`] - Receipt and drawer jobs
//!
//! ## Usage
//! ```rust,ignore
//! let printer = ReceiptPrinter::new(
//!     Arc::new(NetworkDriver::new(48)),
//!     "192.168.1.100:9100".parse()?,
//!     ReceiptFormatter::default(),
//! );
//! printer.print_receipt(&receipt).await?;
//! ```

pub mod address;
pub mod driver;
pub mod error;
pub mod escpos;
pub mod network;
pub mod printer;
pub mod spool;

pub use address::{PrinterAddress, DEFAULT_PRINTER_PORT};
pub use driver::{PrinterConnection, PrinterDriver};
pub use error::{PrinterError, PrinterResult};
pub use network::NetworkDriver;
pub use printer::ReceiptPrinter;
pub use spool::{SpoolDriver, SpoolJob};
