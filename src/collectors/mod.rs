//! Collectors for Open vSwitch metrics.
//!
//! A collector knows a static catalog of [`MetricDef`]s and, on every scrape,
//! turns the output of a daemon status command into [`Sample`]s. Which
//! definitions are visible is decided by the [`MetricSets`] the collector was
//! built with.

pub mod coverage;

use prometheus::core::Desc;
use std::sync::Arc;
use tracing::warn;

use crate::appctl::{AppctlError, StatusQuery};
use crate::metric::{MetricDef, Sample};
use crate::metric_sets::MetricSets;

pub use coverage::CoverageCollector;

/// Names of every collector this crate provides.
pub const AVAILABLE_COLLECTORS: &[&str] = &[coverage::NAME];

/// Errors a collector can return for a whole scrape.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("status query failed: {0}")]
    Query(#[from] AppctlError),
}

/// A source of metrics scraped on demand.
pub trait Collector: Send + Sync {
    /// Stable name, used for logging and the `collector` label.
    fn name(&self) -> &'static str;

    /// Every metric this collector may emit, regardless of enabled sets.
    fn metrics(&self) -> &[MetricDef];

    /// Sets used to filter [`Collector::metrics`].
    fn metric_sets(&self) -> &MetricSets;

    /// Descriptors of the metrics that are currently enabled.
    fn describe(&self) -> Vec<Desc> {
        describe_enabled_metrics(self.metrics(), self.metric_sets())
    }

    /// Runs one collection cycle.
    fn collect(&self) -> Result<Vec<Sample>, CollectError>;
}

/// Shared describe helper: descriptors of all definitions whose set is enabled.
///
/// Definitions with an invalid metric name are logged and left out.
pub fn describe_enabled_metrics(metrics: &[MetricDef], sets: &MetricSets) -> Vec<Desc> {
    metrics
        .iter()
        .filter(|m| sets.has(m.set))
        .filter_map(|m| match m.desc() {
            Ok(desc) => Some(desc),
            Err(e) => {
                warn!("Skipping invalid metric {}: {}", m.fq_name(), e);
                None
            }
        })
        .collect()
}

/// Error returned by [`build_collectors`] for an unknown collector name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collector '{0}'")]
pub struct UnknownCollector(pub String);

/// Instantiates the named collectors, all sharing one status query client.
pub fn build_collectors(
    names: &[String],
    query: Arc<dyn StatusQuery>,
    sets: &MetricSets,
) -> Result<Vec<Box<dyn Collector>>, UnknownCollector> {
    let mut collectors: Vec<Box<dyn Collector>> = Vec::with_capacity(names.len());
    for name in names {
        match name.trim() {
            coverage::NAME => collectors.push(Box::new(CoverageCollector::new(
                query.clone(),
                sets.clone(),
            ))),
            other => return Err(UnknownCollector(other.to_string())),
        }
    }
    Ok(collectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric_sets::MetricSet;

    struct Unreachable;

    impl StatusQuery for Unreachable {
        fn query(&self, command: &str) -> Result<String, AppctlError> {
            Err(AppctlError::MissingResult(command.to_string()))
        }
    }

    static CATALOG: &[MetricDef] = &[
        MetricDef::counter("coverage", "netdev_sent", MetricSet::Perf, "sent"),
        MetricDef::counter("coverage", "drop_action_congestion", MetricSet::Errors, "drops"),
        MetricDef::counter("coverage", "hmap_expand", MetricSet::Debug, "expand"),
    ];

    #[test]
    fn test_describe_enabled_metrics() {
        let sets = MetricSets::new([MetricSet::Perf, MetricSet::Debug]);
        let descs = describe_enabled_metrics(CATALOG, &sets);
        let names: Vec<&str> = descs.iter().map(|d| d.fq_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ovs_coverage_netdev_sent_total",
                "ovs_coverage_hmap_expand_total"
            ]
        );
    }

    #[test]
    fn test_describe_nothing_enabled() {
        assert!(describe_enabled_metrics(CATALOG, &MetricSets::none()).is_empty());
    }

    #[test]
    fn test_build_collectors() {
        let query: Arc<dyn StatusQuery> = Arc::new(Unreachable);
        let collectors =
            build_collectors(&["coverage".to_string()], query.clone(), &MetricSets::all())
                .unwrap();
        assert_eq!(collectors.len(), 1);
        assert_eq!(collectors[0].name(), "coverage");

        let err = build_collectors(&["bfd".to_string()], query, &MetricSets::all())
            .err()
            .unwrap();
        assert_eq!(err, UnknownCollector("bfd".to_string()));
    }
}
