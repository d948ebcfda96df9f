//! Configuration management for the check-in client.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use asistencia_common::constants::{
    CONFIRMATION_MARKER, DEFAULT_API_BASE_URL, DEFAULT_REFRESH_DELAY_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_PATH,
};

use crate::coordinator::CoordinatorSettings;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Attendance service endpoint
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request transport timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Delay before re-fetching history after an accepted check-in
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,

    /// Substring that marks a confirmed check-in
    #[serde(default = "default_confirmation_marker")]
    pub confirmation_marker: String,

    /// Session store written by the login flow
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

/// Values that take precedence over the config file (CLI flags / env)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub session_path: Option<String>,
}

// Default value functions
fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }
fn default_request_timeout() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }
fn default_refresh_delay() -> u64 { DEFAULT_REFRESH_DELAY_MS }
fn default_confirmation_marker() -> String { CONFIRMATION_MARKER.to_string() }
fn default_session_path() -> String { DEFAULT_SESSION_PATH.to_string() }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        if let Some(ref api_url) = overrides.api_url {
            config.api_base_url = api_url.clone();
        }
        if let Some(ref session_path) = overrides.session_path {
            config.session_path = session_path.clone();
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            anyhow::bail!("api_base_url must be an http(s) URL: {}", self.api_base_url);
        }
        if self.confirmation_marker.trim().is_empty() {
            anyhow::bail!("confirmation_marker must not be empty");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            confirmation_marker: self.confirmation_marker.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            refresh_delay_ms: default_refresh_delay(),
            confirmation_marker: default_confirmation_marker(),
            session_path: default_session_path(),
        }
    }
}
