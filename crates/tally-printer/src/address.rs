//! Printer network address: `host` or `host:port`.

use std::fmt;
use std::str::FromStr;

use crate::error::PrinterError;

/// Raw TCP printing port used by thermal printers.
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Where the receipt printer listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterAddress {
    pub host: String,
    pub port: u16,
}

impl PrinterAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        PrinterAddress {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for PrinterAddress {
    type Err = PrinterError;

    /// Parses `192.168.1.100` or `192.168.1.100:9100`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PrinterError::InvalidAddress("empty address".to_string()));
        }

        match s.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(PrinterError::InvalidAddress(s.to_string()));
                }
                let port = port
                    .parse::<u16>()
                    .map_err(|_| PrinterError::InvalidAddress(s.to_string()))?;
                Ok(PrinterAddress::new(host, port))
            }
            None => Ok(PrinterAddress::new(s, DEFAULT_PRINTER_PORT)),
        }
    }
}

impl fmt::Display for PrinterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
