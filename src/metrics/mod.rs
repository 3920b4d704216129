//! Metric extraction and formatting pipeline
//!
//! - **unique**: scalar INFO fields renamed through the catalog
//! - **record**: compound INFO fields split per `sub=value` pair
//! - **latency**: LATENCY HISTORY replies turned into timestamped samples
//! - **putval**: serialization to collectd `PUTVAL` lines
//!
//! Everything in here is pure transformation over already fetched replies.

mod latency;
mod putval;
mod record;
mod types;
mod unique;

pub use latency::{
    latency_max_metric_name, latency_metric_name, latency_metrics, parse_latency_history,
    LatencySample,
};
pub use putval::PutvalFormatter;
pub use record::{decompose_record, record_metrics, RECORD_JOINER};
pub use types::{Metric, MetricKind, MetricValue};
pub use unique::unique_metrics;

use crate::catalog::MetricCatalog;
use crate::info::parse_info;

/// Unique metrics followed by record metrics for one INFO reply
pub fn info_metrics(info: &str, catalog: &MetricCatalog) -> Vec<Metric> {
    let fields = parse_info(info);
    let mut metrics = unique_metrics(&fields, catalog);
    metrics.extend(record_metrics(&fields, catalog));
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_before_records() {
        let info = "# Keyspace\r\ndb0:keys=2,expires=1\r\n# Stats\r\nexpired_keys:4\r\n";
        let metrics = info_metrics(info, MetricCatalog::standard());
        let names: Vec<_> = metrics.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["expired_keys", "db0-keys", "db0-expires"]);
    }
}
