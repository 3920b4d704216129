//! Record decomposition
//!
//! `db0:keys=12,expires=3` becomes `db0-keys = 12` and `db0-expires = 3`.
//! Bad tokens are dropped one at a time, the rest of the record survives.

use super::types::{Metric, MetricKind};
use crate::catalog::{Classification, MetricCatalog};
use crate::error::MetricError;
use crate::info::InfoField;
use tracing::{debug, warn};

/// Joiner between the outer key and the sub-key
pub const RECORD_JOINER: char = '-';

/// Split one record value into metrics named `<outer_key>-<sub_key>`
pub fn decompose_record(outer_key: &str, raw_value: &str) -> Vec<Metric> {
    raw_value
        .split(',')
        .filter_map(|token| decompose_token(outer_key, token))
        .collect()
}

fn decompose_token(outer_key: &str, token: &str) -> Option<Metric> {
    let token = token.trim();
    let Some((sub_key, value)) = token.split_once('=') else {
        warn!(record = outer_key, token, "skipping record token without '='");
        return None;
    };
    if sub_key.is_empty() || value.is_empty() {
        warn!(record = outer_key, token, "skipping incomplete record token");
        return None;
    }

    let name = format!("{}{}{}", outer_key, RECORD_JOINER, sub_key);
    match Metric::parse(name, value, MetricKind::Record) {
        Ok(metric) => Some(metric),
        Err(MetricError::NotNumeric { name, value }) => {
            // Replica records carry ip/state strings every cycle.
            debug!(metric = %name, value = %value, "skipping non-numeric record field");
            None
        }
        Err(e) => {
            warn!(record = outer_key, token, error = %e, "skipping record token");
            None
        }
    }
}

/// Decompose every record field of an INFO reply, in source order
pub fn record_metrics(fields: &[InfoField<'_>], catalog: &MetricCatalog) -> Vec<Metric> {
    fields
        .iter()
        .filter(|f| matches!(catalog.classify(f.key), Classification::Record(_)))
        .flat_map(|f| decompose_record(f.key, f.value))
        .collect()
}
