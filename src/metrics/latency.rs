//! LATENCY HISTORY parsing
//!
//! The reply is an array of `[timestamp, latest, max]` triples, most recent
//! first. Redis reports both durations in milliseconds. The reply is validated
//! here once; everything after this point works with [`LatencySample`].

use super::types::{Metric, MetricKind};
use crate::error::FetchError;
use redis::Value;
use tracing::warn;

/// One entry of an event's latency history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencySample {
    pub event_name: String,
    pub timestamp_secs: u64,
    /// Latest duration, copied unscaled from the reply (milliseconds as Redis reports it)
    pub duration_micros: i64,
    /// Max duration, copied unscaled from the reply (milliseconds as Redis reports it)
    pub max_duration_micros: i64,
}

/// Validate a `LATENCY HISTORY <event>` reply.
///
/// A reply that is not an array fails the whole event. A malformed entry inside
/// the array is dropped on its own.
pub fn parse_latency_history(event: &str, reply: &Value) -> Result<Vec<LatencySample>, FetchError> {
    let entries = match reply {
        Value::Bulk(entries) => entries,
        // Some proxies answer an empty history with a nil reply.
        Value::Nil => return Ok(Vec::new()),
        other => {
            return Err(FetchError::unexpected(
                format!("LATENCY HISTORY {}", event),
                format!("expected an array, got {:?}", other),
            ))
        }
    };

    let samples = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse_entry(event, entry) {
            Some(sample) => Some(sample),
            None => {
                warn!(event, index, entry = ?entry, "dropping malformed latency entry");
                None
            }
        })
        .collect();

    Ok(samples)
}

fn parse_entry(event: &str, entry: &Value) -> Option<LatencySample> {
    let Value::Bulk(fields) = entry else {
        return None;
    };
    let [timestamp, duration, max] = fields.as_slice() else {
        return None;
    };

    Some(LatencySample {
        event_name: event.to_string(),
        timestamp_secs: u64::try_from(integer(timestamp)?).ok()?,
        duration_micros: integer(duration)?,
        max_duration_micros: integer(max)?,
    })
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Data(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
        Value::Status(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Name of the metric carrying the latest duration of `event`
pub fn latency_metric_name(event: &str) -> String {
    format!("latency-{}", event)
}

/// Name of the metric carrying the max duration of `event`
pub fn latency_max_metric_name(event: &str) -> String {
    format!("latency-{}-max", event)
}

/// Turn samples into metrics stamped with their own timestamps.
///
/// With `include_max` each sample also yields a `-max` metric right after it.
pub fn latency_metrics(samples: &[LatencySample], include_max: bool) -> Vec<Metric> {
    let mut metrics = Vec::with_capacity(samples.len() * if include_max { 2 } else { 1 });

    for sample in samples {
        let series = [
            (latency_metric_name(&sample.event_name), sample.duration_micros, true),
            (
                latency_max_metric_name(&sample.event_name),
                sample.max_duration_micros,
                include_max,
            ),
        ];
        for (name, value, wanted) in series {
            if !wanted {
                continue;
            }
            // Names are built from non-empty prefixes, construction cannot fail.
            if let Ok(metric) = Metric::new(name, value, MetricKind::Latency) {
                metrics.push(
                    metric
                        .with_timestamp(sample.timestamp_secs)
                        .with_source_event(sample.event_name.as_str()),
                );
            }
        }
    }

    metrics
}
