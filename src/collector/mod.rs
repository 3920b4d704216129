//! Poll loop
//!
//! One cycle fetches INFO, emits its unique and record metrics, then (when
//! enabled) fetches the latency history of every event and emits those.
//! Fetch failures are logged and only cost that fetch's metrics.

use crate::catalog::{MetricCatalog, LATENCY_EVENTS};
use crate::config::{BridgeConfig, InstanceIdentity};
use crate::error::FetchError;
use crate::io::{Clock, StatsSource};
use crate::metrics::{
    info_metrics, latency_metrics, parse_latency_history, LatencySample, Metric, PutvalFormatter,
};
use crate::observability::{info_span, latency_span, poll_span};
use crate::sink::SharedSink;
use std::future::Future;
use tracing::{debug, error, info, Instrument};

/// What one poll cycle produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Unique and record metrics written
    pub info_metrics: usize,
    /// Latency metrics written
    pub latency_metrics: usize,
    /// INFO could not be fetched this cycle
    pub info_failed: bool,
    /// Latency events whose history could not be fetched
    pub failed_events: Vec<&'static str>,
    /// Lines the sink refused
    pub write_errors: usize,
}

impl CycleReport {
    pub fn total_metrics(&self) -> usize {
        self.info_metrics + self.latency_metrics
    }
}

/// Polls one instance and writes its metrics to a sink
pub struct Collector<S, C> {
    instance: InstanceIdentity,
    config: BridgeConfig,
    latency_enabled: bool,
    source: S,
    sink: SharedSink,
    clock: C,
    formatter: PutvalFormatter,
    catalog: &'static MetricCatalog,
    cycles: u64,
}

impl<S: StatsSource, C: Clock> Collector<S, C> {
    pub fn new(
        instance: InstanceIdentity,
        config: BridgeConfig,
        source: S,
        sink: SharedSink,
        clock: C,
    ) -> Self {
        let formatter = PutvalFormatter::new(&config, &instance);
        Collector {
            instance,
            config,
            latency_enabled: false,
            source,
            sink,
            clock,
            formatter,
            catalog: MetricCatalog::standard(),
            cycles: 0,
        }
    }

    /// Also poll LATENCY HISTORY every cycle
    pub fn with_latency(mut self, enabled: bool) -> Self {
        self.latency_enabled = enabled;
        self
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle. Never fails; problems are logged and reported.
    pub async fn poll_once(&mut self) -> CycleReport {
        self.cycles += 1;
        let span = poll_span(&self.instance.name, self.cycles);
        self.poll_cycle().instrument(span).await
    }

    async fn poll_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        match self.collect_info().instrument(info_span()).await {
            Ok(metrics) => {
                report.info_metrics = metrics.len();
                report.write_errors += self.emit(&metrics);
            }
            Err(e) => {
                error!(
                    instance = %self.instance.name,
                    error = %e,
                    "failed to fetch info from redis instance"
                );
                report.info_failed = true;
            }
        }

        if self.latency_enabled {
            let metrics = self.collect_latency(&mut report).await;
            report.latency_metrics = metrics.len();
            report.write_errors += self.emit(&metrics);
        }

        if let Err(e) = self.sink.flush() {
            error!(error = %e, "failed to flush output");
        }

        debug!(
            info_metrics = report.info_metrics,
            latency_metrics = report.latency_metrics,
            failed_events = report.failed_events.len(),
            "poll cycle finished"
        );
        report
    }

    async fn collect_info(&mut self) -> Result<Vec<Metric>, FetchError> {
        let text = self.source.fetch_info().await?;
        Ok(info_metrics(&text, self.catalog))
    }

    async fn collect_latency(&mut self, report: &mut CycleReport) -> Vec<Metric> {
        let mut metrics = Vec::new();

        for &event in LATENCY_EVENTS {
            let result: Result<Vec<LatencySample>, FetchError> = async {
                let reply = self.source.fetch_latency_history(event).await?;
                parse_latency_history(event, &reply)
            }
            .instrument(latency_span(event))
            .await;

            match result {
                Ok(samples) => {
                    metrics.extend(latency_metrics(&samples, self.config.latency_include_max));
                }
                Err(e) => {
                    error!(
                        instance = %self.instance.name,
                        event,
                        error = %e,
                        "failed to fetch latency history from redis instance"
                    );
                    report.failed_events.push(event);
                }
            }
        }

        metrics
    }

    /// Write metrics, returning the number of lines that failed
    fn emit(&self, metrics: &[Metric]) -> usize {
        let now = self.clock.now_secs();
        let mut failures = 0;
        for metric in metrics {
            let line = self.formatter.format(metric, now);
            if let Err(e) = self.sink.write_line(&line) {
                failures += 1;
                error!(metric = metric.name(), error = %e, "failed to write metric");
            }
        }
        failures
    }

    /// Poll, sleep for the configured interval, repeat until `shutdown` resolves
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            instance = %self.instance,
            interval_secs = self.config.interval_secs,
            latency = self.latency_enabled,
            "starting redis collector"
        );

        tokio::pin!(shutdown);
        loop {
            self.poll_once().await;

            tokio::select! {
                _ = &mut shutdown => {
                    info!(cycles = self.cycles, "shutdown requested, stopping collector");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{FixedClock, StaticSource};
    use crate::sink::MemorySink;
    use std::sync::Arc;

    const NOW: u64 = 1_700_000_500;

    fn collector(source: StaticSource) -> (Collector<StaticSource, FixedClock>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let instance = InstanceIdentity::parse("cache:127.0.0.1:6379").unwrap();
        let collector = Collector::new(
            instance,
            BridgeConfig::default(),
            source,
            sink.clone(),
            FixedClock::new(NOW),
        );
        (collector, sink)
    }

    #[tokio::test]
    async fn test_info_cycle_writes_lines() {
        let source = StaticSource::new().with_info("used_memory:2048\r\ndb0:keys=12,expires=3\r\n");
        let (mut collector, sink) = collector(source);

        let report = collector.poll_once().await;

        assert_eq!(report.info_metrics, 3);
        assert_eq!(report.latency_metrics, 0);
        assert_eq!(
            sink.lines(),
            vec![
                "PUTVAL localhost/redis-cache/memory interval=10 1700000500:2048",
                "PUTVAL localhost/redis-cache/db0-keys interval=10 1700000500:12",
                "PUTVAL localhost/redis-cache/db0-expires interval=10 1700000500:3",
            ]
        );
        assert_eq!(sink.flush_count(), 1);
    }

    #[tokio::test]
    async fn test_info_failure_is_reported_not_fatal() {
        let source = StaticSource::new().with_latency_samples("fork", &[(1_700_000_000, 9, 9)]);
        let (collector, sink) = collector(source);
        let mut collector = collector.with_latency(true);

        let report = collector.poll_once().await;

        assert!(report.info_failed);
        assert_eq!(report.latency_metrics, 1);
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_latency_skipped_when_disabled() {
        let source = StaticSource::new().with_info("");
        let (mut collector, _sink) = collector(source.clone());
        collector.poll_once().await;
        assert!(source.latency_calls().is_empty());
    }

    #[tokio::test]
    async fn test_latency_queries_every_event_in_order() {
        let source = StaticSource::new().with_info("");
        let (collector, _sink) = collector(source.clone());
        let mut collector = collector.with_latency(true);
        collector.poll_once().await;
        assert_eq!(source.latency_calls(), LATENCY_EVENTS.to_vec());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let source = StaticSource::new().with_info("uptime_in_seconds:5\r\n");
        let (collector, sink) = collector(source.clone());

        collector.run(async {}).await;

        assert_eq!(source.info_calls(), 1);
        assert_eq!(sink.lines_for("uptime").len(), 1);
    }
}
