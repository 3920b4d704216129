//! Metric catalog
//!
//! Naming compatibility with the collectd Redis plugin
//! (<https://collectd.org/wiki/index.php/Plugin:Redis>). The table entries are
//! the names already stored in existing time series databases and must be
//! reproduced exactly.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Scalar INFO fields and the canonical names they are written under
pub const UNIQUE_METRICS: &[(&str, &str)] = &[
    ("blocked_clients", "blocked_clients"),
    ("connected_clients", "current_connections-clients"),
    ("connected_slaves", "current_connections-slaves"),
    ("evicted_keys", "evicted_keys"),
    ("expired_keys", "expired_keys"),
    ("keyspace_hits", "cache_result-hits"),
    ("keyspace_misses", "cache_result-misses"),
    ("pubsub_channels", "pubsub-channels"),
    ("pubsub_patterns", "pubsub-patterns"),
    ("rdb_changes_since_last_save", "volatile_changes"),
    ("total_commands_processed", "total_operations"),
    ("total_connections_received", "total_connections"),
    ("total_net_input_bytes", "total_bytes-input"),
    ("total_net_output_bytes", "total_bytes-output"),
    ("uptime_in_seconds", "uptime"),
    ("used_cpu_sys_children", "ps_cputime-children/syst"),
    ("used_cpu_sys", "ps_cputime-daemon/syst"),
    ("used_cpu_user_children", "ps_cputime-children/user"),
    ("used_cpu_user", "ps_cputime-daemon/user"),
    ("used_memory_lua", "memory_lua"),
    ("used_memory", "memory"),
];

/// Latency events queried with `LATENCY HISTORY`
pub const LATENCY_EVENTS: &[&str] = &[
    "command",
    "fast-command",
    "fork",
    "expire-cycle",
    "eviction-cycle",
    "eviction-del",
];

static CATALOG: LazyLock<MetricCatalog> =
    LazyLock::new(|| MetricCatalog::from_entries(UNIQUE_METRICS));

/// Compound INFO fields that are split into one metric per `sub=value` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `cmdstat_<command>:calls=..,usec=..,usec_per_call=..`
    CommandStats,
    /// `db<N>:keys=..,expires=..,avg_ttl=..`
    Keyspace,
    /// `slave<N>:ip=..,port=..,state=..,offset=..,lag=..`
    Replica,
}

impl RecordKind {
    /// Classify a raw INFO key, `None` if it is not a record key
    pub fn classify(raw_key: &str) -> Option<Self> {
        if let Some(command) = raw_key.strip_prefix("cmdstat_") {
            if !command.is_empty() {
                return Some(RecordKind::CommandStats);
            }
        }
        if is_numbered(raw_key, "db") {
            return Some(RecordKind::Keyspace);
        }
        if is_numbered(raw_key, "slave") {
            return Some(RecordKind::Replica);
        }
        None
    }
}

fn is_numbered(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// How the pipeline treats one INFO field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Unique(&'static str),
    Record(RecordKind),
    Ignored,
}

/// Read-only rename table
#[derive(Debug)]
pub struct MetricCatalog {
    entries: HashMap<&'static str, &'static str>,
}

impl MetricCatalog {
    fn from_entries(entries: &[(&'static str, &'static str)]) -> Self {
        MetricCatalog {
            entries: entries.iter().copied().collect(),
        }
    }

    /// The process-wide catalog
    pub fn standard() -> &'static MetricCatalog {
        &CATALOG
    }

    /// Canonical name for a scalar INFO key
    pub fn lookup(&self, raw_key: &str) -> Option<&'static str> {
        self.entries.get(raw_key).copied()
    }

    /// Record keys take precedence over the rename table
    pub fn classify(&self, raw_key: &str) -> Classification {
        if let Some(kind) = RecordKind::classify(raw_key) {
            return Classification::Record(kind);
        }
        match self.lookup(raw_key) {
            Some(name) => Classification::Unique(name),
            None => Classification::Ignored,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
