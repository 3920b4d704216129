//! Command-line arguments
//!
//! The positional layout is the one collectd exec configurations already use:
//! `redis-collectd <name>:<host>:<port>[:<password>] [l]`.

use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Legacy spelling: `redis-collectd version`
pub const VERSION_ARG: &str = "version";

/// Second positional argument enabling latency metrics
pub const LATENCY_MODE_ARG: &str = "l";

/// Log output format (logs always go to stderr)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Poll a Redis instance and print collectd PUTVAL lines
#[derive(Parser, Debug, Clone)]
#[command(name = "redis-collectd")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Redis instance as <name>:<host>:<port>[:<password>], or `version`
    pub connection: String,

    /// Pass `l` to also collect LATENCY HISTORY metrics
    pub mode: Option<String>,

    /// Optional TOML file with bridge settings (environment still wins)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// `redis-collectd version` prints the version and exits
    pub fn is_version_request(&self) -> bool {
        self.connection == VERSION_ARG
    }

    /// Whether latency metrics were requested; any mode other than `l` is rejected
    pub fn latency_enabled(&self) -> Result<bool, ConfigError> {
        match self.mode.as_deref() {
            None => Ok(false),
            Some(LATENCY_MODE_ARG) => Ok(true),
            Some(other) => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("redis-collectd").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_connection_only() {
        let args = parse(&["cache:localhost:6379"]);
        assert_eq!(args.connection, "cache:localhost:6379");
        assert!(!args.latency_enabled().unwrap());
        assert!(!args.is_version_request());
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_latency_mode() {
        let args = parse(&["cache:localhost:6379", "l"]);
        assert!(args.latency_enabled().unwrap());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let args = parse(&["cache:localhost:6379", "latency"]);
        assert!(matches!(
            args.latency_enabled(),
            Err(ConfigError::InvalidMode(m)) if m == "latency"
        ));
    }

    #[test]
    fn test_version_request() {
        assert!(parse(&["version"]).is_version_request());
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "cache:localhost:6379",
            "--config",
            "/etc/redis-collectd.toml",
            "-v",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/redis-collectd.toml")));
        assert!(args.verbose);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_connection_is_an_error() {
        assert!(CliArgs::try_parse_from(["redis-collectd"]).is_err());
    }

    #[test]
    fn test_too_many_positionals() {
        assert!(CliArgs::try_parse_from(["redis-collectd", "a:b:1", "l", "extra"]).is_err());
    }
}
