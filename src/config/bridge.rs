use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Poll interval in seconds, as set by collectd's exec plugin
pub const ENV_INTERVAL: &str = "COLLECTD_INTERVAL";
/// Host name to report under, as set by collectd's exec plugin
pub const ENV_HOSTNAME: &str = "COLLECTD_HOSTNAME";

pub const DEFAULT_INTERVAL_SECS: f64 = 10.0;
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Process-wide settings, built once at startup and passed by reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Seconds between polls, also written as `interval=` on every line
    pub interval_secs: f64,
    /// Host segment of every PUTVAL identifier
    pub hostname: String,
    /// Also emit `latency-<event>-max` for every latency sample
    pub latency_include_max: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            interval_secs: DEFAULT_INTERVAL_SECS,
            hostname: DEFAULT_HOSTNAME.to_string(),
            latency_include_max: false,
        }
    }
}

impl BridgeConfig {
    /// Defaults, then the optional TOML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig =
            toml::from_str(content).map_err(|source| ConfigError::ParseFile {
                path: origin.to_string(),
                source,
            })?;
        config.validate()
    }

    /// Apply `COLLECTD_INTERVAL`/`COLLECTD_HOSTNAME`. Empty variables count as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = lookup(ENV_INTERVAL) {
            self.interval_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidInterval {
                value: raw.clone(),
                reason: "not a number",
            })?;
        }
        if let Some(hostname) = lookup(ENV_HOSTNAME) {
            self.hostname = hostname;
        }

        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(ConfigError::InvalidInterval {
                value: self.interval_secs.to_string(),
                reason: "must be a positive number of seconds",
            });
        }
        if Duration::try_from_secs_f64(self.interval_secs).is_err() {
            return Err(ConfigError::InvalidInterval {
                value: self.interval_secs.to_string(),
                reason: "too large",
            });
        }
        Ok(self)
    }

    /// Poll interval; values that skipped `validate` fall back to the default
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_INTERVAL_SECS))
    }
}
