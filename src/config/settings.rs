//! Configuration settings for the Aircall MCP server.

use crate::error::{AircallError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Aircall public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.aircall.io/v1";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub aircall: AircallSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Aircall API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AircallSettings {
    /// Aircall API ID (account identifier).
    pub api_id: Option<String>,
    /// Aircall API token (secret).
    pub api_token: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum requests per minute sent to the API.
    pub rate_limit: u32,
}

impl Default for AircallSettings {
    fn default() -> Self {
        Self {
            api_id: None,
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            rate_limit: 60,
        }
    }
}

impl AircallSettings {
    /// Check that both credentials are present and non-empty.
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_id) && present(&self.api_token)
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Apply `AIRCALL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `AIRCALL_*` overrides from an arbitrary lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = lookup("AIRCALL_API_ID") {
            self.aircall.api_id = Some(id);
        }
        if let Some(token) = lookup("AIRCALL_API_TOKEN") {
            self.aircall.api_token = Some(token);
        }
        if let Some(url) = lookup("AIRCALL_BASE_URL") {
            self.aircall.base_url = url;
        }
        if let Some(timeout) = lookup("AIRCALL_TIMEOUT") {
            self.aircall.timeout_seconds = timeout.trim().parse().map_err(|_| {
                AircallError::Config(format!("AIRCALL_TIMEOUT must be an integer, got '{}'", timeout))
            })?;
        }
        if let Some(limit) = lookup("AIRCALL_RATE_LIMIT") {
            self.aircall.rate_limit = limit.trim().parse().map_err(|_| {
                AircallError::Config(format!("AIRCALL_RATE_LIMIT must be an integer, got '{}'", limit))
            })?;
        }

        Ok(self)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aircall-mcp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Render the settings as TOML with the API token masked.
    pub fn to_masked_toml(&self) -> Result<String> {
        let mut masked = self.clone();
        if let Some(token) = masked.aircall.api_token.as_mut() {
            *token = mask_secret(token);
        }
        toml::to_string_pretty(&masked).map_err(|e| AircallError::Config(e.to_string()))
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
