//! Error types for redis-collectd
//!
//! Only [`ConfigError`] is ever fatal, and only at startup. Everything raised
//! while polling is logged at the collector boundary and the cycle carries on.

use thiserror::Error;

/// Startup/precondition failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} does not match <name>:<host>:<port>[:<password>] scheme")]
    InvalidConnectionString(String),

    #[error("invalid poll interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: &'static str },

    #[error("the second argument needs to be 'l' to collect latency metrics, got {0:?}")]
    InvalidMode(String),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid redis address: {0}")]
    Client(#[from] redis::RedisError),
}

/// Failure to obtain one reply from the data source
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("unexpected reply to {command}: {detail}")]
    UnexpectedReply { command: String, detail: String },
}

impl FetchError {
    pub fn unexpected(command: impl Into<String>, detail: impl Into<String>) -> Self {
        FetchError::UnexpectedReply {
            command: command.into(),
            detail: detail.into(),
        }
    }
}

/// Rejection of a single metric at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("metric name is empty")]
    EmptyName,

    #[error("value {value:?} of {name} is not a finite number")]
    NotNumeric { name: String, value: String },
}
