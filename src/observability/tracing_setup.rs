//! Tracing Setup
//!
//! Logs go to stderr: stdout carries the PUTVAL stream read by collectd.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` selects the level (default `info`); `verbose` forces `debug`.
pub fn init(format: LogFormat, verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_without_panicking() {
        let _ = init(LogFormat::Text, false);
        assert!(init(LogFormat::Json, true).is_err());
    }
}
