//! # Server Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            bind 0.0.0.0:3000, printer 192.168.1.100:9100  │
//! │  2. tally.toml          $TALLY_CONFIG, else the platform config dir    │
//! │  3. Environment         TALLY_BIND_ADDR      TALLY_DB_PATH             │
//! │                         TALLY_STATIC_DIR     TALLY_PRINTER_ADDR        │
//! │                         TALLY_PRINTER_MODE   TALLY_STORE_NAME          │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `tally.toml`
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:3000"
//! static_dir = "static"
//!
//! [database]
//! path = "/var/lib/tally/tally.db"
//!
//! [printer]
//! address = "192.168.1.100:9100"
//! mode = "network"
//! connect_timeout_secs = 5
//! paper_width = 48
//!
//! [merchant]
//! name = "MINI MARKET"
//! tax_id = "RUC 0991234567001"
//! address = ["Av. Principal 123"]
//! closing_message = "Thank you for your visit"
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use tally_core::MerchantInfo;
use tally_printer::PrinterAddress;

/// Printer address used when nothing is configured.
pub const DEFAULT_PRINTER_ADDR: &str = "192.168.1.100:9100";

/// Narrowest paper that still fits the receipt item table.
pub const MIN_PAPER_WIDTH: usize = 32;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Printer Mode
// =============================================================================

/// Which printer driver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterMode {
    /// Real device over TCP.
    #[default]
    Network,

    /// In-memory printer that logs jobs as text.
    Spool,
}

impl std::fmt::Display for PrinterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrinterMode::Network => write!(f, "network"),
            PrinterMode::Spool => write!(f, "spool"),
        }
    }
}

impl std::str::FromStr for PrinterMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "network" | "tcp" => Ok(PrinterMode::Network),
            "spool" | "dev" => Ok(PrinterMode::Spool),
            other => Err(ConfigError::Invalid(format!(
                "Unknown printer mode: '{}'. Valid options: network, spool",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory the browser UI is served from. A relative path is resolved
    /// by [`ServerConfig::static_dir`].
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to `tally.db` in the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterSettings {
    /// `host` or `host:port`.
    #[serde(default = "default_printer_addr")]
    pub address: String,

    #[serde(default)]
    pub mode: PrinterMode,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Characters per line.
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,
}

fn default_printer_addr() -> String {
    DEFAULT_PRINTER_ADDR.to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_paper_width() -> usize {
    tally_core::receipt::DEFAULT_PAPER_WIDTH
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            address: default_printer_addr(),
            mode: PrinterMode::default(),
            connect_timeout_secs: default_connect_timeout(),
            paper_width: default_paper_width(),
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub printer: PrinterSettings,

    /// Receipt header and footer.
    #[serde(default)]
    pub merchant: MerchantInfo,
}

impl ServerConfig {
    /// Loads configuration from defaults, file, then environment.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("TALLY_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.bind_addr()?;
        self.printer_address()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.printer.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "printer.connect_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.printer.paper_width < MIN_PAPER_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "printer.paper_width must be at least {}",
                MIN_PAPER_WIDTH
            )));
        }

        if self.merchant.name.trim().is_empty() {
            return Err(ConfigError::Invalid("merchant.name must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `TALLY_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("TALLY_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(path) = lookup("TALLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("TALLY_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }

        if let Some(addr) = lookup("TALLY_PRINTER_ADDR") {
            debug!(addr = %addr, "Overriding printer address from environment");
            self.printer.address = addr;
        }

        if let Some(mode) = lookup("TALLY_PRINTER_MODE") {
            match mode.parse() {
                Ok(parsed) => self.printer.mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown printer mode in environment"),
            }
        }

        if let Some(name) = lookup("TALLY_STORE_NAME") {
            self.merchant.name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "pos")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn bind_addr(&self) -> ConfigResult<SocketAddr> {
        self.server.bind_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid bind address: {}", self.server.bind_addr))
        })
    }

    pub fn printer_address(&self) -> ConfigResult<PrinterAddress> {
        self.printer
            .address
            .parse()
            .map_err(|e: tally_printer::PrinterError| ConfigError::Invalid(e.to_string()))
    }

    /// The UI directory to serve.
    ///
    /// A relative `static_dir` is looked up in the working directory first,
    /// then next to the server crate's manifest, so `cargo run` from the
    /// workspace root still finds the bundled UI.
    pub fn static_dir(&self) -> PathBuf {
        let configured = &self.server.static_dir;
        if configured.is_absolute() || configured.is_dir() {
            return configured.clone();
        }

        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join(configured);
        if bundled.is_dir() {
            debug!(dir = ?bundled, "Serving bundled UI");
            return bundled;
        }

        warn!(dir = ?configured, "Static UI directory not found");
        configured.clone()
    }

    /// The SQLite file to open.
    ///
    /// Falls back to `tally.db` in the platform data dir, creating the dir,
    /// and finally to `tally.db` in the working directory.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        match directories::ProjectDirs::from("com", "tally", "pos") {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                Ok(data_dir.join("tally.db"))
            }
            None => Ok(PathBuf::from("tally.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_printer_mode_parsing() {
        assert_eq!("network".parse::<PrinterMode>().unwrap(), PrinterMode::Network);
        assert_eq!("SPOOL".parse::<PrinterMode>().unwrap(), PrinterMode::Spool);
        assert!("usb".parse::<PrinterMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.printer.address, "192.168.1.100:9100");
        assert_eq!(config.printer.mode, PrinterMode::Network);
        assert_eq!(config.printer_address().unwrap().port, 9100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            [printer]
            address = "10.0.0.5"
            mode = "spool"

            [merchant]
            name = "La Esquina"
            "#,
        )
        .unwrap();

        assert_eq!(config.printer.mode, PrinterMode::Spool);
        assert_eq!(config.printer_address().unwrap(), PrinterAddress::new("10.0.0.5", 9100));
        assert_eq!(config.printer.paper_width, 48);
        assert_eq!(config.merchant.name, "La Esquina");
        assert_eq!(config.merchant.closing_message, MerchantInfo::default().closing_message);
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TALLY_PRINTER_ADDR", "192.168.0.50:9101"),
            ("TALLY_PRINTER_MODE", "spool"),
            ("TALLY_DB_PATH", "/tmp/tally.db"),
            ("TALLY_STORE_NAME", "Tienda"),
        ]
        .into_iter()
        .collect();

        let mut config = ServerConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.printer.address, "192.168.0.50:9101");
        assert_eq!(config.printer.mode, PrinterMode::Spool);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/tally.db"));
        assert_eq!(config.merchant.name, "Tienda");
    }

    #[test]
    fn test_unknown_mode_in_env_is_ignored() {
        let mut config = ServerConfig::default();
        config.apply_overrides(|k| (k == "TALLY_PRINTER_MODE").then(|| "usb".to_string()));
        assert_eq!(config.printer.mode, PrinterMode::Network);
    }

    #[test]
    fn test_default_static_dir_finds_bundled_ui() {
        let dir = ServerConfig::default().static_dir();
        assert!(dir.join("index.html").is_file());
    }

    #[test]
    fn test_missing_static_dir_is_kept() {
        let mut config = ServerConfig::default();

        config.server.static_dir = PathBuf::from("no-such-ui");
        assert_eq!(config.static_dir(), PathBuf::from("no-such-ui"));

        config.server.static_dir = PathBuf::from("/srv/tally/ui");
        assert_eq!(config.static_dir(), PathBuf::from("/srv/tally/ui"));
    }

    #[test]
    fn test_validation() {
        let mut config = ServerConfig::default();

        config.server.bind_addr = "nope".to_string();
        assert!(config.validate().is_err());

        config = ServerConfig::default();
        config.printer.address = "host:port".to_string();
        assert!(config.validate().is_err());

        config = ServerConfig::default();
        config.printer.paper_width = 20;
        assert!(config.validate().is_err());

        config = ServerConfig::default();
        config.printer.connect_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServerConfig::default()).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[printer]"));
        assert!(toml_str.contains("[merchant]"));
    }
}
