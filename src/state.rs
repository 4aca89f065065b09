//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use ovs_coverage_exporter::CollectorRegistry;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Registry};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Lets the Prometheus registry own a handle on collectors that `/health`
/// inspects as well.
pub struct SharedCollectors(pub Arc<CollectorRegistry>);

impl Collector for SharedCollectors {
    fn desc(&self) -> Vec<&Desc> {
        self.0.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.0.collect()
    }
}

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    /// Registry gathered on every scrape.
    pub registry: Registry,
    /// Second handle on the collectors, used by `/health`.
    pub collectors: Arc<CollectorRegistry>,
    pub scrape_duration: Gauge,
    pub config: Arc<Config>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}
