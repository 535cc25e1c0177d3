//! # Spool Driver
//!
//! A printer that lives in memory. Jobs are kept in order and logged as
//! plain text, which is what development setups and tests want instead of
//! a real device on the network.
//!
//! Only the last [`SPOOL_CAPACITY`] jobs are kept; older ones are dropped so
//! a long-running dev server does not grow without bound.
//!
//! `SpoolDriver::unreachable()` behaves like a printer that is switched off:
//! every `open` fails and nothing is recorded.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use tally_core::receipt::{render_row, Alignment, TableCell};
use tally_core::PrintDirective;

use crate::address::PrinterAddress;
use crate::driver::{PrinterConnection, PrinterDriver};
use crate::error::{PrinterError, PrinterResult};

/// Jobs retained by a spool before the oldest is evicted.
pub const SPOOL_CAPACITY: usize = 64;

/// One job as received by the spool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolJob {
    pub addr: PrinterAddress,
    pub directives: Vec<PrintDirective>,
}

#[derive(Debug, Clone)]
pub struct SpoolDriver {
    jobs: Arc<Mutex<VecDeque<SpoolJob>>>,
    paper_width: usize,
    reachable: bool,
}

impl SpoolDriver {
    pub fn new(paper_width: usize) -> Self {
        SpoolDriver {
            jobs: Arc::new(Mutex::new(VecDeque::with_capacity(SPOOL_CAPACITY))),
            paper_width,
            reachable: true,
        }
    }

    /// A spool whose printer can never be reached.
    pub fn unreachable(paper_width: usize) -> Self {
        SpoolDriver {
            reachable: false,
            ..SpoolDriver::new(paper_width)
        }
    }

    /// Retained jobs, oldest first.
    pub async fn jobs(&self) -> Vec<SpoolJob> {
        self.jobs.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl PrinterDriver for SpoolDriver {
    async fn open(&self, addr: &PrinterAddress) -> PrinterResult<Box<dyn PrinterConnection>> {
        if !self.reachable {
            warn!(%addr, "Spool printer unreachable");
            return Err(PrinterError::connection(addr, "spool printer is offline"));
        }

        Ok(Box::new(SpoolConnection {
            jobs: self.jobs.clone(),
            paper_width: self.paper_width,
            addr: addr.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "spool"
    }
}

struct SpoolConnection {
    jobs: Arc<Mutex<VecDeque<SpoolJob>>>,
    paper_width: usize,
    addr: PrinterAddress,
}

#[async_trait]
impl PrinterConnection for SpoolConnection {
    async fn emit(&mut self, directives: &[PrintDirective]) -> PrinterResult<()> {
        info!(
            addr = %self.addr,
            "Spooled job:\n{}",
            render_plain(directives, self.paper_width)
        );

        let mut jobs = self.jobs.lock().await;
        if jobs.len() == SPOOL_CAPACITY {
            jobs.pop_front();
        }
        jobs.push_back(SpoolJob {
            addr: self.addr.clone(),
            directives: directives.to_vec(),
        });
        Ok(())
    }

    async fn close(&mut self) -> PrinterResult<()> {
        Ok(())
    }
}

/// Renders directives as the plain text a printer would show.
///
/// Sizes and emphasis are dropped; alignment is applied against
/// `paper_width`. Cuts and drawer pulses show up as markers.
pub fn render_plain(directives: &[PrintDirective], paper_width: usize) -> String {
    let mut align = Alignment::Left;
    let mut lines: Vec<String> = Vec::new();

    for directive in directives {
        match directive {
            PrintDirective::Align(a) => align = *a,
            PrintDirective::Line(text) => {
                lines.push(TableCell::new(text.as_str(), align, paper_width).render())
            }
            PrintDirective::Rule => lines.push("-".repeat(paper_width)),
            PrintDirective::TableRow(cells) => lines.push(render_row(cells)),
            PrintDirective::Feed(n) => lines.extend((0..*n).map(|_| String::new())),
            PrintDirective::Cut => lines.push("- - - 8< - - -".to_string()),
            PrintDirective::PulseDrawer => lines.push("[drawer]".to_string()),
            PrintDirective::Bold(_) | PrintDirective::TextSize { .. } => {}
        }
    }

    lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
