//! # Service Configuration
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual fields.
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_addr: "127.0.0.1:3000"
//! database_url: "sqlite:finance.db"
//! allowed_origin: "https://example.org"
//! max_connections: 5
//! max_amount: 10000000.0
//! currency:
//!   code: "RUB"
//!   decimals: 2
//! ```
//!
//! ## Environment
//!
//! - `FINANCE_CONFIG`: path of the YAML file (no file is read when unset)
//! - `BIND_ADDR`, `DATABASE_URL`, `ALLOWED_ORIGIN`: override the fields above

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

use crate::domain::allocation_calculator::DEFAULT_MAX_AMOUNT;
use crate::domain::models::money::Currency;

pub const CONFIG_PATH_ENV: &str = "FINANCE_CONFIG";

/// Largest number of decimal places a currency may be configured with
const MAX_DECIMALS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// Origin allowed by CORS; any origin when unset
    pub allowed_origin: Option<String>,
    pub max_connections: u32,
    pub currency: Currency,
    /// Largest income amount accepted, in major units
    pub max_amount: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_url: "sqlite:finance.db".to_string(),
            allowed_origin: None,
            max_connections: 5,
            currency: Currency::default(),
            max_amount: DEFAULT_MAX_AMOUNT,
        }
    }
}

impl AppConfig {
    /// Load configuration from `FINANCE_CONFIG` (if set) and the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.database_url = database_url;
        }
        if let Some(origin) = lookup("ALLOWED_ORIGIN") {
            self.allowed_origin = Some(origin).filter(|o| !o.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if let Some(origin) = &self.allowed_origin {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allowed origin: {}", origin))?;
        }
        if self.database_url.trim().is_empty() {
            bail!("database_url cannot be empty");
        }
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.currency.code.trim().is_empty() {
            bail!("currency code cannot be empty");
        }
        if self.currency.decimals > MAX_DECIMALS {
            bail!(
                "currency decimals must be at most {}, got {}",
                MAX_DECIMALS,
                self.currency.decimals
            );
        }
        if !self.max_amount.is_finite() || self.max_amount <= 0.0 {
            bail!("max_amount must be a positive number, got {}", self.max_amount);
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
        assert_eq!(config.currency.code, "RUB");
        assert_eq!(config.max_amount, 10_000_000.0);
    }

    #[test]
    fn test_partial_yaml_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr: \"0.0.0.0:8080\"").unwrap();
        writeln!(file, "currency:").unwrap();
        writeln!(file, "  code: \"JPY\"").unwrap();
        writeln!(file, "  decimals: 0").unwrap();

        let config = AppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.currency, Currency::new("JPY", 0));
        assert_eq!(config.database_url, "sqlite:finance.db");
        assert_eq!(config.max_connections, 5);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::from_yaml_file(dir.path().join("missing.yaml")).is_err());

        let path = dir.path().join("broken.yaml");
        fs::write(&path, "max_amount: [not, a, number]").unwrap();
        assert!(AppConfig::from_yaml_file(&path).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("ALLOWED_ORIGIN", "https://t.me"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.allowed_origin.as_deref(), Some("https://t.me"));
    }

    #[test]
    fn test_blank_origin_override_clears_origin() {
        let mut config = AppConfig {
            allowed_origin: Some("https://t.me".to_string()),
            ..Default::default()
        };
        config.apply_overrides(|key| (key == "ALLOWED_ORIGIN").then(|| " ".to_string()));
        assert_eq!(config.allowed_origin, None);
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            AppConfig {
                bind_addr: "not an address".to_string(),
                ..Default::default()
            },
            AppConfig {
                max_connections: 0,
                ..Default::default()
            },
            AppConfig {
                max_amount: -1.0,
                ..Default::default()
            },
            AppConfig {
                currency: Currency::new("RUB", 9),
                ..Default::default()
            },
            AppConfig {
                database_url: " ".to_string(),
                ..Default::default()
            },
            AppConfig {
                allowed_origin: Some("bad\norigin".to_string()),
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }
}
