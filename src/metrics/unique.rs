//! Scalar INFO fields renamed through the catalog

use super::types::{Metric, MetricKind};
use crate::catalog::{Classification, MetricCatalog};
use crate::info::InfoField;
use tracing::warn;

/// Build one metric per catalogued scalar field, in source order.
/// Fields the catalog does not know are dropped silently.
pub fn unique_metrics(fields: &[InfoField<'_>], catalog: &MetricCatalog) -> Vec<Metric> {
    fields
        .iter()
        .filter_map(|field| match catalog.classify(field.key) {
            Classification::Unique(name) => {
                match Metric::parse(name, field.value, MetricKind::Unique) {
                    Ok(metric) => Some(metric),
                    Err(e) => {
                        warn!(field = field.key, error = %e, "dropping INFO field");
                        None
                    }
                }
            }
            Classification::Record(_) | Classification::Ignored => None,
        })
        .collect()
}
