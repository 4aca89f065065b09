//! Metrics command implementation.
//!
//! Lists every metric the configured collectors know about.

use ovs_coverage_exporter::{build_collectors, AppctlError, StatusQuery};
use std::sync::Arc;

use crate::config::Config;

/// Placeholder client: listing metrics never talks to the daemon.
struct NoQuery;

impl StatusQuery for NoQuery {
    fn query(&self, command: &str) -> Result<String, AppctlError> {
        Err(AppctlError::MissingResult(command.to_string()))
    }
}

/// Prints the metric catalog of every configured collector.
pub fn command_metrics(
    enabled_only: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let sets = config.metric_sets();
    let collectors = build_collectors(&config.collector_names(), Arc::new(NoQuery), &sets)?;

    println!("📊 OVS Coverage Exporter - Metrics");
    println!("==================================");
    println!("Enabled metric sets: {}", sets);

    for collector in &collectors {
        let metrics: Vec<_> = collector
            .metrics()
            .iter()
            .filter(|m| !enabled_only || sets.has(m.set))
            .collect();

        println!("\n🔹 {} ({} metrics)", collector.name(), metrics.len());
        for m in metrics {
            println!(
                "   {} {:50} {:8} {:8} {}",
                if sets.has(m.set) { "✅" } else { "  " },
                m.fq_name(),
                m.set,
                m.value_type.as_str(),
                m.help
            );
        }
    }

    Ok(())
}
