//! collectd `PUTVAL` wire lines
//!
//! ```text
//! PUTVAL <hostname>/redis-<instance>/<canonical name> interval=<N> <timestamp>:<value>
//! ```
//!
//! The plugin segment is `redis-<instance>` as written by the collectd Redis
//! plugin, so graphs keep working when switching over.

use super::types::Metric;
use crate::config::{BridgeConfig, InstanceIdentity};
use std::fmt::Write;

/// Serializes metrics for one instance
#[derive(Debug, Clone)]
pub struct PutvalFormatter {
    /// `<hostname>/redis-<instance>/`, computed once
    identifier_prefix: String,
    interval: String,
}

impl PutvalFormatter {
    pub fn new(config: &BridgeConfig, instance: &InstanceIdentity) -> Self {
        PutvalFormatter {
            identifier_prefix: format!("{}/redis-{}/", config.hostname, instance.name),
            // f64 Display prints `10` for 10.0 and `2.5` for 2.5
            interval: config.interval_secs.to_string(),
        }
    }

    /// Format one metric. `now` is used when the metric has no timestamp of its own.
    pub fn format(&self, metric: &Metric, now: u64) -> String {
        let timestamp = metric.timestamp().unwrap_or(now);
        let mut line = String::with_capacity(
            16 + self.identifier_prefix.len() + metric.name().len() + self.interval.len() + 32,
        );
        // Writing into a String cannot fail.
        let _ = write!(
            line,
            "PUTVAL {}{} interval={} {}:{}",
            self.identifier_prefix,
            metric.name(),
            self.interval,
            timestamp,
            metric.value_text()
        );
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricKind, MetricValue};

    fn formatter(interval_secs: f64) -> PutvalFormatter {
        let config = BridgeConfig {
            interval_secs,
            hostname: "web01".to_string(),
            ..BridgeConfig::default()
        };
        let instance = InstanceIdentity::parse("cache:127.0.0.1:6379").unwrap();
        PutvalFormatter::new(&config, &instance)
    }

    /// Inverse of `format`, enough to check what a collectd reader would see
    fn parse_line(line: &str) -> (String, String, u64, String) {
        let mut parts = line.split(' ');
        assert_eq!(parts.next(), Some("PUTVAL"));
        let identifier = parts.next().unwrap().to_string();
        let interval = parts.next().unwrap().strip_prefix("interval=").unwrap().to_string();
        let (ts, value) = parts.next().unwrap().split_once(':').unwrap();
        assert_eq!(parts.next(), None);
        (identifier, interval, ts.parse().unwrap(), value.to_string())
    }

    #[test]
    fn test_defaults_timestamp_to_now() {
        let metric = Metric::new("memory", 1024i64, MetricKind::Unique).unwrap();
        assert_eq!(
            formatter(10.0).format(&metric, 1_700_000_123),
            "PUTVAL web01/redis-cache/memory interval=10 1700000123:1024"
        );
    }

    #[test]
    fn test_explicit_timestamp_wins() {
        let metric = Metric::new("latency-command", 120i64, MetricKind::Latency)
            .unwrap()
            .with_timestamp(1_700_000_000);
        assert_eq!(
            formatter(10.0).format(&metric, 1_800_000_000),
            "PUTVAL web01/redis-cache/latency-command interval=10 1700000000:120"
        );
    }

    #[test]
    fn test_fractional_interval() {
        let metric = Metric::new("uptime", 5i64, MetricKind::Unique).unwrap();
        let line = formatter(2.5).format(&metric, 1);
        assert!(line.contains(" interval=2.5 "), "{}", line);
    }

    #[test]
    fn test_round_trip() {
        let metric = Metric::parse("ps_cputime-daemon/syst", "12.345678", MetricKind::Unique)
            .unwrap()
            .with_timestamp(1_699_999_999);
        let line = formatter(10.0).format(&metric, 0);
        let (identifier, interval, ts, value) = parse_line(&line);

        assert_eq!(identifier, "web01/redis-cache/ps_cputime-daemon/syst");
        assert_eq!(interval, "10");
        assert_eq!(ts, 1_699_999_999);
        assert_eq!(MetricValue::parse(&value), Some(metric.value()));
    }

    #[test]
    fn test_negative_and_large_values() {
        let negative = Metric::new("db0-avg_ttl", -1i64, MetricKind::Record).unwrap();
        let large = Metric::new("total_bytes-input", i64::MAX, MetricKind::Unique).unwrap();
        let f = formatter(10.0);
        assert!(f.format(&negative, 1).ends_with(" 1:-1"));
        assert!(f.format(&large, 1).ends_with(&format!(" 1:{}", i64::MAX)));
    }

    #[test]
    fn test_values_beyond_f64_precision_are_exact() {
        let f = formatter(10.0);
        for raw in [
            "18446744073709551615",
            "9223372036854775808",
            "0.12345678901234567890",
            "12345678901234567890.5",
        ] {
            let metric = Metric::parse("memory", raw, MetricKind::Unique).unwrap();
            let (_, _, _, value) = parse_line(&f.format(&metric, 1));
            assert_eq!(value, raw);
        }
    }
}
