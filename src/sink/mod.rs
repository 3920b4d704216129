//! Output sinks for PUTVAL lines
//!
//! - Production: stdout, read by collectd's exec plugin
//! - Tests: in-memory capture for verification

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Destination of formatted wire lines
pub trait MetricSink: Send + Sync {
    /// Write one line; the sink appends the newline
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Called once at the end of every poll cycle
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes to the process's standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl MetricSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Captures lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    flushes: Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Lines whose identifier ends with `/<metric_name>`
    pub fn lines_for(&self, metric_name: &str) -> Vec<String> {
        let suffix = format!("/{} ", metric_name);
        self.lines
            .lock()
            .iter()
            .filter(|l| l.contains(&suffix))
            .cloned()
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }
}

impl MetricSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        *self.flushes.lock() += 1;
        Ok(())
    }
}

impl<S: MetricSink + ?Sized> MetricSink for Arc<S> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Arc wrapper for trait object usage
pub type SharedSink = Arc<dyn MetricSink>;
