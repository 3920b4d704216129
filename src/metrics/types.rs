//! Metric value types

use crate::error::MetricError;
use std::fmt;

/// Where a metric came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Scalar INFO field renamed through the catalog
    Unique,
    /// One `sub=value` pair of a compound INFO field
    Record,
    /// One LATENCY HISTORY sample
    Latency,
}

/// Numeric value, kept in the representation the server reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    /// Counters above `i64::MAX`
    Unsigned(u64),
    Float(f64),
}

impl MetricValue {
    /// Parse a raw INFO value. Integers stay integers; anything else must be a
    /// finite float (`nan`/`inf` are rejected).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(v) = raw.parse::<i64>() {
            return Some(MetricValue::Integer(v));
        }
        if let Ok(v) = raw.parse::<u64>() {
            return Some(MetricValue::Unsigned(v));
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(MetricValue::Float(v)),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Unsigned(v) => write!(f, "{}", v),
            // Shortest representation that round-trips the f64.
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

/// One output data point
///
/// `text` is what goes on the wire: the trimmed server text for parsed values,
/// so digits beyond f64 precision are never lost.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    name: String,
    value: MetricValue,
    text: String,
    timestamp: Option<u64>,
    source_event: Option<String>,
    kind: MetricKind,
}

impl Metric {
    /// Build a metric from an already numeric value
    pub fn new(
        name: impl Into<String>,
        value: impl Into<MetricValue>,
        kind: MetricKind,
    ) -> Result<Self, MetricError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MetricError::EmptyName);
        }
        let value = value.into();
        Ok(Metric {
            name,
            text: value.to_string(),
            value,
            timestamp: None,
            source_event: None,
            kind,
        })
    }

    /// Build a metric from the textual value the server returned
    pub fn parse(
        name: impl Into<String>,
        raw_value: &str,
        kind: MetricKind,
    ) -> Result<Self, MetricError> {
        let name = name.into();
        match MetricValue::parse(raw_value) {
            Some(value) => {
                let mut metric = Metric::new(name, value, kind)?;
                metric.text = raw_value.trim().to_string();
                Ok(metric)
            }
            None => Err(MetricError::NotNumeric {
                name,
                value: raw_value.to_string(),
            }),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_source_event(mut self, event: impl Into<String>) -> Self {
        self.source_event = Some(event.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> MetricValue {
        self.value
    }

    /// Value as written on the wire
    pub fn value_text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn source_event(&self) -> Option<&str> {
        self.source_event.as_deref()
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}
