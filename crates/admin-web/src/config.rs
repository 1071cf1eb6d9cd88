//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use ledger_core::DuplicatePolicy;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Brand shown in the footer of printable reports.
    pub brand: String,
    /// How repeated transactions for one order are reconciled.
    pub duplicate_policy: DuplicatePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:ledger.db?mode=rwc` |
    /// | `REPORT_BRAND` | Printable report footer brand | `VIPO System Reports` |
    /// | `DUPLICATE_POLICY` | `last_seen` or `sum` | `last_seen` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ADMIN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:ledger.db?mode=rwc".to_string());

        let brand = env::var("REPORT_BRAND")
            .unwrap_or_else(|_| "VIPO System Reports".to_string());

        let duplicate_policy = match env::var("DUPLICATE_POLICY") {
            Ok(value) => parse_policy(&value)?,
            Err(_) => DuplicatePolicy::default(),
        };

        Ok(Self {
            addr,
            database_url,
            brand,
            duplicate_policy,
        })
    }
}

fn parse_policy(value: &str) -> Result<DuplicatePolicy, ConfigError> {
    match value.trim() {
        "last_seen" => Ok(DuplicatePolicy::LastSeen),
        "sum" => Ok(DuplicatePolicy::Sum),
        other => Err(ConfigError::InvalidDuplicatePolicy(other.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("Invalid DUPLICATE_POLICY: {0} (expected last_seen or sum)")]
    InvalidDuplicatePolicy(String),
}
