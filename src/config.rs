//! Server configuration read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATUTE_DIR: &str = "statutes";
pub const DEFAULT_REGIME: &str = "2026";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Directory of extra statute JSON files.
    pub statute_dir: PathBuf,
    /// Regime used when a request does not name one.
    pub default_regime: String,
}

impl Config {
    /// Reads `PAYROLL_BIND_ADDR`, `PAYROLL_STATUTE_DIR` and
    /// `PAYROLL_DEFAULT_REGIME`, falling back to the defaults above.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("PAYROLL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .parse()
            .with_context(|| format!("invalid PAYROLL_BIND_ADDR {addr:?}"))?;
        let statute_dir = PathBuf::from(
            lookup("PAYROLL_STATUTE_DIR").unwrap_or_else(|| DEFAULT_STATUTE_DIR.to_string()),
        );
        let default_regime =
            lookup("PAYROLL_DEFAULT_REGIME").unwrap_or_else(|| DEFAULT_REGIME.to_string());
        Ok(Config { bind_addr, statute_dir, default_regime })
    }
}
