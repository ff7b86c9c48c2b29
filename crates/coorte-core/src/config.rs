//! Configuration management for the Coorte backtesting system.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Override for the market data base URL (useful for testing).
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory report files are written to.
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs = match env::var("COORTE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| Error::Config {
                message: format!("COORTE_HTTP_TIMEOUT_SECS is not a valid integer: {raw}"),
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            provider: ProviderConfig {
                base_url: env::var("COORTE_PROVIDER_BASE_URL").ok(),
                timeout_secs,
            },
            report: ReportConfig {
                output_dir: env::var("COORTE_REPORT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
            },
        })
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            provider: ProviderConfig {
                base_url: None,
                timeout_secs: 5,
            },
            report: ReportConfig {
                output_dir: PathBuf::from("."),
            },
        }
    }
}
