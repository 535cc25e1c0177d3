//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use tally_core::ReceiptFormatter;
use tally_db::{Database, DbConfig};
use tally_printer::{NetworkDriver, PrinterDriver, ReceiptPrinter, SpoolDriver};

use crate::config::{PrinterMode, ServerConfig};

/// Everything a handler needs. Cloned into each request by axum.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub printer: ReceiptPrinter,
}

impl AppState {
    pub fn new(db: Database, printer: ReceiptPrinter) -> Self {
        AppState { db, printer }
    }

    /// Opens the database and builds the printer from configuration.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db_path = config.database_path()?;
        info!(?db_path, "Database path determined");

        let db = Database::new(
            DbConfig::new(db_path).max_connections(config.database.max_connections),
        )
        .await?;

        Ok(AppState::new(db, build_printer(config)?))
    }
}

/// Builds the receipt printer for the configured mode.
pub fn build_printer(config: &ServerConfig) -> Result<ReceiptPrinter, Box<dyn std::error::Error>> {
    let address = config.printer_address()?;
    let width = config.printer.paper_width;

    let driver: Arc<dyn PrinterDriver> = match config.printer.mode {
        PrinterMode::Network => Arc::new(
            NetworkDriver::new(width)
                .io_timeout(Duration::from_secs(config.printer.connect_timeout_secs)),
        ),
        PrinterMode::Spool => Arc::new(SpoolDriver::new(width)),
    };

    info!(mode = %config.printer.mode, %address, "Printer configured");

    Ok(ReceiptPrinter::new(
        driver,
        address,
        ReceiptFormatter::new(config.merchant.clone(), width),
    ))
}
