//! # Receipt Printer
//!
//! Ties the receipt layout to a driver and a configured address.
//!
//! ```text
//! print_receipt(req)                open_drawer()
//!      │                                 │
//!      ▼                                 ▼
//! ReceiptFormatter::receipt()       ReceiptFormatter::drawer_pulse()
//!      │                                 │
//!      └──────────────┬──────────────────┘
//!                     ▼
//!           driver.open(addr)   ── fails? nothing printed, error returned
//!                     ▼
//!           conn.emit(directives)
//!                     ▼
//!           conn.close()
//! ```

use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

use tally_core::receipt::{ReceiptFormatter, ReceiptRequest};
use tally_core::PrintDirective;

use crate::address::PrinterAddress;
use crate::driver::PrinterDriver;
use crate::error::PrinterResult;

/// Timestamp format printed under the ticket number.
pub const PRINTED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Prints receipts and kicks the cash drawer.
///
/// Cheap to clone; shared by all HTTP handlers.
#[derive(Clone)]
pub struct ReceiptPrinter {
    driver: Arc<dyn PrinterDriver>,
    address: PrinterAddress,
    formatter: ReceiptFormatter,
}

impl ReceiptPrinter {
    pub fn new(
        driver: Arc<dyn PrinterDriver>,
        address: PrinterAddress,
        formatter: ReceiptFormatter,
    ) -> Self {
        ReceiptPrinter {
            driver,
            address,
            formatter,
        }
    }

    /// Prints a receipt stamped with the current local time.
    pub async fn print_receipt(&self, receipt: &ReceiptRequest) -> PrinterResult<()> {
        let printed_at = Local::now().format(PRINTED_AT_FORMAT).to_string();
        let directives = self.formatter.receipt(receipt, &printed_at)?;

        self.run_job(&directives).await?;
        info!(sale_id = receipt.sale_id, "Receipt printed");
        Ok(())
    }

    /// Pulses the cash drawer. Independent of any sale.
    pub async fn open_drawer(&self) -> PrinterResult<()> {
        self.run_job(&self.formatter.drawer_pulse()).await?;
        info!("Cash drawer opened");
        Ok(())
    }

    async fn run_job(&self, directives: &[PrintDirective]) -> PrinterResult<()> {
        let mut conn = self.driver.open(&self.address).await?;

        let emitted = conn.emit(directives).await;
        let closed = conn.close().await;

        if let Err(e) = &emitted {
            warn!(addr = %self.address, error = %e, "Print job failed");
        }
        emitted.and(closed)
    }
}

impl std::fmt::Debug for ReceiptPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptPrinter")
            .field("driver", &self.driver.name())
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrinterError;
    use crate::spool::SpoolDriver;
    use tally_core::{Money, SaleLineDetail};

    fn printer(spool: &SpoolDriver) -> ReceiptPrinter {
        ReceiptPrinter::new(
            Arc::new(spool.clone()),
            PrinterAddress::new("spool", 9100),
            ReceiptFormatter::default(),
        )
    }

    fn receipt() -> ReceiptRequest {
        ReceiptRequest {
            sale_id: 42,
            total: Money::from_cents(750),
            items: vec![SaleLineDetail {
                name: "Agua 500ml".to_string(),
                quantity: 3,
                price: Money::from_cents(250),
            }],
        }
    }

    #[tokio::test]
    async fn test_print_receipt_emits_one_job() {
        let spool = SpoolDriver::new(48);
        printer(&spool).print_receipt(&receipt()).await.unwrap();

        let jobs = spool.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].directives.last(), Some(&PrintDirective::Cut));
        assert!(jobs[0]
            .directives
            .contains(&PrintDirective::Line("Ticket #000042".to_string())));
    }

    #[tokio::test]
    async fn test_open_drawer_only_pulses() {
        let spool = SpoolDriver::new(48);
        printer(&spool).open_drawer().await.unwrap();

        let jobs = spool.jobs().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].directives, vec![PrintDirective::PulseDrawer]);
    }

    #[tokio::test]
    async fn test_unreachable_printer_prints_nothing() {
        let spool = SpoolDriver::unreachable(48);
        let err = printer(&spool).print_receipt(&receipt()).await.unwrap_err();

        assert!(matches!(err, PrinterError::Connection { .. }));
        assert!(spool.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_receipt_is_not_sent() {
        let spool = SpoolDriver::new(48);
        let mut huge = receipt();
        huge.items[0].quantity = 100_000_000_000_000_000;

        let err = printer(&spool).print_receipt(&huge).await.unwrap_err();

        assert!(matches!(err, PrinterError::Layout(_)));
        assert!(!err.is_unreachable());
        assert!(spool.jobs().await.is_empty());
    }
}
