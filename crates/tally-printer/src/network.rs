//! # Network Printer Driver
//!
//! Raw TCP to the printer's job port (9100), ESC/POS bytes on the wire.
//! One connection per job; the printer closes nothing on its own.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use tally_core::PrintDirective;

use crate::address::PrinterAddress;
use crate::driver::{PrinterConnection, PrinterDriver};
use crate::error::{PrinterError, PrinterResult};
use crate::escpos::EscPosEncoder;

/// Default time allowed for connecting and for writing one job.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Driver for printers reachable over TCP.
#[derive(Debug, Clone)]
pub struct NetworkDriver {
    encoder: EscPosEncoder,
    io_timeout: Duration,
}

impl NetworkDriver {
    pub fn new(paper_width: usize) -> Self {
        NetworkDriver {
            encoder: EscPosEncoder::new(paper_width),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Sets the connect and write timeout.
    pub fn io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }
}

#[async_trait]
impl PrinterDriver for NetworkDriver {
    async fn open(&self, addr: &PrinterAddress) -> PrinterResult<Box<dyn PrinterConnection>> {
        debug!(%addr, "Connecting to printer");

        let connect = TcpStream::connect((addr.host.as_str(), addr.port));
        let stream = match timeout(self.io_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!(%addr, error = %e, "Printer connection failed");
                return Err(PrinterError::connection(addr, e));
            }
            Err(_) => {
                warn!(%addr, "Printer connection timed out");
                return Err(PrinterError::Timeout {
                    addr: addr.to_string(),
                    secs: self.io_timeout.as_secs(),
                });
            }
        };

        // Jobs are small; send them as soon as they are written
        stream.set_nodelay(true)?;

        Ok(Box::new(NetworkConnection {
            stream,
            encoder: self.encoder,
            io_timeout: self.io_timeout,
            addr: addr.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "network"
    }
}

struct NetworkConnection {
    stream: TcpStream,
    encoder: EscPosEncoder,
    io_timeout: Duration,
    addr: PrinterAddress,
}

#[async_trait]
impl PrinterConnection for NetworkConnection {
    async fn emit(&mut self, directives: &[PrintDirective]) -> PrinterResult<()> {
        let bytes = self.encoder.encode(directives);
        debug!(addr = %self.addr, bytes = bytes.len(), "Sending job");

        let io_timeout = self.io_timeout;
        let stream = &mut self.stream;
        let write = async {
            stream.write_all(&bytes).await?;
            stream.flush().await
        };

        match timeout(io_timeout, write).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PrinterError::Timeout {
                addr: self.addr.to_string(),
                secs: io_timeout.as_secs(),
            }),
        }
    }

    async fn close(&mut self) -> PrinterResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
