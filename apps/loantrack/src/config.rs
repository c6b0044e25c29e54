//! # Configuration
//!
//! Settings come from a TOML file, then environment variables override
//! individual keys.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100        # requests/second, 0 disables
//! cors_origins = []       # ["*"] allows every origin
//!
//! [display]
//! theme = "light"
//! ```
//!
//! ## Environment Overrides
//!
//! - `LOANTRACK_HOST`, `LOANTRACK_PORT`, `LOANTRACK_RATE_LIMIT`
//! - `LOANTRACK_CORS_ORIGINS`: comma-separated list, or `*`
//! - `LOANTRACK_THEME`: `light` or `dark`
//! - `LOANTRACK_API_KEY`: bearer token; only ever read from the environment
//!
//! Without `--config`, `loantrack.toml` in the working directory is read if
//! present and defaults apply otherwise. A path given explicitly must exist.

use loantrack_core::{Theme, TrackerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "loantrack.toml";

/// Maximum accepted config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only.
    pub cors_origins: Vec<String>,
    /// Bearer token required by the API. Never read from or written to the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub theme: Theme,
}

// =============================================================================
// LOADING
// =============================================================================

impl AppConfig {
    /// Load the configuration, then apply environment overrides.
    ///
    /// `explicit` is the `--config` path and must exist. Without it the
    /// default file is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TrackerError> {
        let config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => Self::load_optional_file(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_optional_file(path: &Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_file(path)
    }

    /// Load from `path` without consulting the environment.
    pub fn load_file(path: &Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            return Err(TrackerError::ConfigError(format!(
                "Config file {:?} does not exist",
                path
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| TrackerError::IoError(format!("Cannot read config metadata: {}", e)))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(TrackerError::ConfigError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::IoError(format!("Read config {:?}: {}", path, e)))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Self::from_toml_str(&contents)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TrackerError> {
        toml::from_str(contents).map_err(|e| TrackerError::ConfigError(e.to_string()))
    }

    /// Apply `LOANTRACK_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, TrackerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("LOANTRACK_HOST") {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = get("LOANTRACK_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                TrackerError::ConfigError(format!("Invalid LOANTRACK_PORT '{}'", port))
            })?;
        }
        if let Some(rate) = get("LOANTRACK_RATE_LIMIT") {
            self.server.rate_limit = rate.trim().parse().map_err(|_| {
                TrackerError::ConfigError(format!("Invalid LOANTRACK_RATE_LIMIT '{}'", rate))
            })?;
        }
        if let Some(origins) = get("LOANTRACK_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(theme) = get("LOANTRACK_THEME") {
            self.display.theme = theme
                .parse::<Theme>()
                .map_err(|e| TrackerError::ConfigError(format!("LOANTRACK_THEME: {}", e)))?;
        }
        if let Some(key) = get("LOANTRACK_API_KEY") {
            self.server.api_key = Some(key);
        }

        Ok(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
