//! Configuration loading for the feed subsystem
//!
//! Resolution priority order:
//! 1. Explicit path argument (highest priority)
//! 2. `PULSE_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/pulse/config.toml` on Linux)
//! 4. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming a config file path
pub const CONFIG_ENV_VAR: &str = "PULSE_CONFIG";

/// Observed backend poll cadences range 5-30 seconds; values outside that
/// window are clamped rather than rejected.
const MIN_POLL_SECS: u64 = 5;
const MAX_POLL_SECS: u64 = 30;

/// Feed subsystem configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the backend REST API
    pub api_base_url: String,
    /// Activity store capacity; oldest-by-arrival entries are evicted
    pub max_items: usize,
    /// Periodic full-refetch cadence (eventual-consistency backstop)
    pub poll_interval_secs: u64,
    /// Transient toast auto-dismiss duration
    pub toast_duration_ms: u64,
    /// EventBus broadcast channel capacity
    pub event_bus_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            max_items: 50,
            poll_interval_secs: 15,
            toast_duration_ms: 3000,
            event_bus_capacity: 256,
        }
    }
}

impl FeedConfig {
    /// Load configuration following the priority order above
    ///
    /// A missing file falls through to defaults; an unreadable or invalid
    /// file is a hard `Config` error so a typo'd config never silently
    /// reverts to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: FeedConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid config {}: {e}", path.display())))?;
        Ok(config.validated())
    }

    /// Clamp out-of-range values instead of failing startup
    fn validated(mut self) -> Self {
        if self.poll_interval_secs < MIN_POLL_SECS || self.poll_interval_secs > MAX_POLL_SECS {
            let clamped = self.poll_interval_secs.clamp(MIN_POLL_SECS, MAX_POLL_SECS);
            warn!(
                "poll_interval_secs {} outside {}-{}, clamping to {}",
                self.poll_interval_secs, MIN_POLL_SECS, MAX_POLL_SECS, clamped
            );
            self.poll_interval_secs = clamped;
        }
        self
    }

    /// Toast auto-dismiss duration as a `Duration`
    pub fn toast_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.toast_duration_ms)
    }

    /// Poll cadence as a `Duration`
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }
}

/// Platform config file location
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pulse").join("config.toml"))
}
