//! Scripted I/O for tests: replies are fixed up front, failures are injected
//! per command.

use super::{Clock, FetchFuture, StatsSource};
use crate::error::FetchError;
use parking_lot::Mutex;
use redis::{ErrorKind, RedisError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct CallLog {
    info: usize,
    latency: Vec<String>,
}

/// [`StatsSource`] answering from canned replies.
///
/// Events without a scripted history answer with an empty history.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    info: Option<String>,
    latency: HashMap<String, Value>,
    failing_events: HashSet<String>,
    calls: Arc<Mutex<CallLog>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to INFO with `text`
    pub fn with_info(mut self, text: impl Into<String>) -> Self {
        self.info = Some(text.into());
        self
    }

    /// Reply to `LATENCY HISTORY <event>` with `reply`
    pub fn with_latency(mut self, event: &str, reply: Value) -> Self {
        self.latency.insert(event.to_string(), reply);
        self
    }

    /// Reply to `LATENCY HISTORY <event>` with `(timestamp, latest, max)` triples
    pub fn with_latency_samples(self, event: &str, samples: &[(i64, i64, i64)]) -> Self {
        let reply = Value::Bulk(
            samples
                .iter()
                .map(|&(ts, latest, max)| {
                    Value::Bulk(vec![Value::Int(ts), Value::Int(latest), Value::Int(max)])
                })
                .collect(),
        );
        self.with_latency(event, reply)
    }

    /// Make `LATENCY HISTORY <event>` fail with an I/O error
    pub fn failing_latency(mut self, event: &str) -> Self {
        self.failing_events.insert(event.to_string());
        self
    }

    /// Number of INFO fetches so far (shared between clones)
    pub fn info_calls(&self) -> usize {
        self.calls.lock().info
    }

    /// Latency events fetched so far, in order (shared between clones)
    pub fn latency_calls(&self) -> Vec<String> {
        self.calls.lock().latency.clone()
    }

    fn simulated_io_error() -> FetchError {
        FetchError::Redis(RedisError::from((
            ErrorKind::IoError,
            "simulated connection reset",
        )))
    }
}

impl StatsSource for StaticSource {
    fn fetch_info(&mut self) -> FetchFuture<'_, String> {
        self.calls.lock().info += 1;
        let result = self.info.clone().ok_or_else(Self::simulated_io_error);
        Box::pin(async move { result })
    }

    fn fetch_latency_history<'a>(&'a mut self, event: &'a str) -> FetchFuture<'a, Value> {
        self.calls.lock().latency.push(event.to_string());
        let result = if self.failing_events.contains(event) {
            Err(Self::simulated_io_error())
        } else {
            Ok(self
                .latency
                .get(event)
                .cloned()
                .unwrap_or_else(|| Value::Bulk(Vec::new())))
        };
        Box::pin(async move { result })
    }
}

/// [`Clock`] stuck at a chosen second until advanced
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    pub fn new(secs: u64) -> Self {
        FixedClock {
            secs: AtomicU64::new(secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_replies() {
        let mut source = StaticSource::new()
            .with_info("used_memory:1\r\n")
            .with_latency_samples("fork", &[(1_700_000_000, 10, 20)]);

        assert_eq!(source.fetch_info().await.unwrap(), "used_memory:1\r\n");
        match source.fetch_latency_history("fork").await.unwrap() {
            Value::Bulk(entries) => assert_eq!(entries.len(), 1),
            other => panic!("unexpected reply {:?}", other),
        }
        // Unscripted events have an empty history.
        assert_eq!(
            source.fetch_latency_history("command").await.unwrap(),
            Value::Bulk(vec![])
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut source = StaticSource::new().failing_latency("eviction-del");
        assert!(source.fetch_info().await.is_err());
        assert!(source.fetch_latency_history("eviction-del").await.is_err());
        assert!(source.fetch_latency_history("fork").await.is_ok());
    }

    #[tokio::test]
    async fn test_call_log_is_shared_between_clones() {
        let source = StaticSource::new().with_info("");
        let mut handle = source.clone();
        handle.fetch_info().await.unwrap();
        handle.fetch_latency_history("fork").await.unwrap();
        assert_eq!(source.info_calls(), 1);
        assert_eq!(source.latency_calls(), vec!["fork".to_string()]);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(100);
        assert_eq!(clock.now_secs(), 100);
        clock.advance(10);
        assert_eq!(clock.now_secs(), 110);
    }
}
