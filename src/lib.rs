//! redis-collectd
//!
//! Polls a Redis instance for `INFO` and `LATENCY HISTORY` and prints the
//! results as collectd `PUTVAL` lines, named like the collectd Redis plugin.

pub mod catalog;
pub mod collector;
pub mod config;
pub mod error;
pub mod info;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod sink;

pub use catalog::{MetricCatalog, RecordKind, LATENCY_EVENTS};
pub use collector::{Collector, CycleReport};
pub use config::{BridgeConfig, CliArgs, InstanceIdentity};
pub use error::{ConfigError, FetchError, MetricError};
pub use metrics::{LatencySample, Metric, MetricKind, MetricValue, PutvalFormatter};
