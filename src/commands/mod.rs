//! CLI command implementations for ovs-coverage-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: Configuration and control socket validation
//! - `collect`: One-shot metrics collection
//! - `config`: Configuration file generation
//! - `metrics`: Metric catalog listing

pub mod check;
pub mod collect;
pub mod config;
pub mod metrics;

// Re-export command functions
pub use check::command_check;
pub use collect::command_collect;
pub use config::command_config;
pub use metrics::command_metrics;

use ovs_coverage_exporter::{build_collectors, CollectorRegistry, UnixCtlClient};
use std::sync::Arc;

use crate::config::Config;

/// Builds the collectors described by `config`, all sharing one control socket client.
pub fn build_registry(config: &Config) -> anyhow::Result<CollectorRegistry> {
    let client = UnixCtlClient::new(config.socket_location(), config.appctl_timeout());
    let collectors = build_collectors(
        &config.collector_names(),
        Arc::new(client),
        &config.metric_sets(),
    )?;
    let registry = CollectorRegistry::new(collectors)?;
    Ok(if config.enable_telemetry.unwrap_or(true) {
        registry
    } else {
        registry.without_telemetry()
    })
}
