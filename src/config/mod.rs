//! Startup configuration
//!
//! Everything in here is resolved once before the first poll. Failures are
//! [`ConfigError`](crate::error::ConfigError)s and end the process.

mod bridge;
mod cli;
mod instance;

pub use bridge::{
    BridgeConfig, DEFAULT_HOSTNAME, DEFAULT_INTERVAL_SECS, ENV_HOSTNAME, ENV_INTERVAL,
};
pub use cli::{CliArgs, LogFormat, LATENCY_MODE_ARG, VERSION_ARG};
pub use instance::InstanceIdentity;
