//! Application configuration.
//!
//! Only defaults live here. Command-line flags always win, and every value
//! read from disk is validated by the same code path as the flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RSURF_CONFIG";

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default render parameters.
    pub defaults: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Render parameters used when the command line leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Square raster dimension.
    pub size: i64,

    /// Quality level (0..=3).
    pub quality: i64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "rsurf_renderer=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            size: 512,
            quality: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error
    /// so the caller can decide whether to warn and continue.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))
    }
}

/// Config file location: `$RSURF_CONFIG`, else the XDG config directory.
pub fn config_file_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("rsurf").join("config.json")
}
