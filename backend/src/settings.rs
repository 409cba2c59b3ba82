//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ENRICHMENT_*` environment variables, or a
//! configuration file; accessors apply defaults and validate.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::UserEnrichmentConfig;

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The directory base URL does not parse.
    #[error("invalid base URL {value:?}: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The bind address does not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// A concurrency limit was set to zero.
    #[error("{field} must be at least 1")]
    ZeroLimit {
        /// Name of the offending setting.
        field: &'static str,
    },
}

/// Configuration values for the enrichment service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ENRICHMENT")]
pub struct EnrichmentSettings {
    /// Base URL of the upstream user directory.
    pub base_url: Option<String>,
    /// Per-request upstream timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Users resolved concurrently.
    pub max_concurrent_users: Option<usize>,
    /// Address references resolved concurrently per user.
    pub max_concurrent_addresses: Option<usize>,
}

impl EnrichmentSettings {
    /// Return the configured directory base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|error| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Return the upstream request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }

    /// Return the HTTP bind address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse::<SocketAddr>()
            .map_err(|error| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: error.to_string(),
            })
    }

    /// Return the fan-out limits for the enrichment service.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroLimit`] when a limit is set to zero.
    pub fn enrichment_config(&self) -> Result<UserEnrichmentConfig, SettingsError> {
        let defaults = UserEnrichmentConfig::default();
        Ok(UserEnrichmentConfig {
            max_concurrent_users: non_zero(
                "max_concurrent_users",
                self.max_concurrent_users,
                defaults.max_concurrent_users,
            )?,
            max_concurrent_addresses: non_zero(
                "max_concurrent_addresses",
                self.max_concurrent_addresses,
                defaults.max_concurrent_addresses,
            )?,
        })
    }
}

fn non_zero(
    field: &'static str,
    value: Option<usize>,
    default: usize,
) -> Result<usize, SettingsError> {
    match value {
        Some(0) => Err(SettingsError::ZeroLimit { field }),
        Some(limit) => Ok(limit),
        None => Ok(default),
    }
}
