//! Open vSwitch coverage exporter library.
//!
//! This library turns the textual output of `ovs-vswitchd` status commands
//! into Prometheus metrics. It is used by the `ovs-coverage-exporter` binary
//! but has no dependency on its HTTP server, so collectors can be embedded
//! or tested on their own.
//!
//! # Features
//!
//! - **Control socket client**: JSON-RPC over the daemon unixctl socket
//! - **Coverage collector**: `coverage/show` counters, zero-filled when absent
//! - **Metric sets**: enable or disable whole families of metrics
//! - **Prometheus bridge**: plug collectors into a `prometheus::Registry`
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ovs_coverage_exporter::{
//!     CollectorRegistry, CoverageCollector, MetricSets, SocketLocation, UnixCtlClient,
//! };
//!
//! let client = UnixCtlClient::new(SocketLocation::default(), Duration::from_secs(5));
//! let coverage = CoverageCollector::new(Arc::new(client), MetricSets::default());
//!
//! let registry = prometheus::Registry::new();
//! registry
//!     .register(Box::new(CollectorRegistry::new(vec![Box::new(coverage)]).unwrap()))
//!     .unwrap();
//! let families = registry.gather();
//! println!("{} metric families", families.len());
//! ```

pub mod appctl;
pub mod collectors;
pub mod metric;
pub mod metric_sets;
pub mod registry;

// Re-export main types for convenience
pub use appctl::{AppctlError, SocketLocation, StatusQuery, UnixCtlClient};
pub use collectors::{
    build_collectors, describe_enabled_metrics, CollectError, Collector, CoverageCollector,
};
pub use metric::{MetricDef, Sample, ValueType};
pub use metric_sets::{MetricSet, MetricSets};
pub use registry::{CollectorRegistry, CollectorStatus};
