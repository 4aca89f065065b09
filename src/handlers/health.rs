//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that reports the
//! outcome of the most recent run of every collector.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use ovs_coverage_exporter::CollectorStatus;
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::state::SharedState;

// Time conversion constants
const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    let statuses = state.collectors.status();

    // No scrape yet is not a failure.
    let failed = statuses.iter().filter(|s| !s.success).count();
    let (status, message) = if statuses.is_empty() {
        (StatusCode::OK, "OK - No scrape yet")
    } else if failed == 0 {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Collector failures")
    };

    let uptime_str = format_uptime(state.start_time.elapsed().as_secs());
    let table = render_collector_table(&statuses, state.collectors.scrapes());

    debug!("Health check: {} - {}", status, message);
    (
        status,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!("{message}\n\nUptime: {uptime_str}\n\n{table}"),
    )
}

/// Formats an uptime in minutes, hours or days.
pub fn format_uptime(uptime_seconds: u64) -> String {
    let uptime_hours = uptime_seconds as f64 / SECONDS_PER_HOUR;
    if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    }
}

/// Renders collector status as a plain-text table.
fn render_collector_table(statuses: &[CollectorStatus], scrapes: u64) -> String {
    let mut out = String::new();
    writeln!(out, "COLLECTORS").ok();
    writeln!(out, "==========").ok();
    writeln!(out).ok();
    writeln!(out, "{:20} | {:>8} | {:>14}", "Collector", "Status", "Duration (ms)").ok();
    writeln!(out, "{}", "-".repeat(48)).ok();

    for s in statuses {
        writeln!(
            out,
            "{:20} | {:>8} | {:>14.3}",
            s.name,
            if s.success { "ok" } else { "failed" },
            s.duration_seconds * 1000.0
        )
        .ok();
    }

    writeln!(out).ok();
    writeln!(out, "Scrapes served: {}", scrapes).ok();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(90), "1.5 minutes");
        assert_eq!(format_uptime(2 * 3600), "2.0 hours");
        assert_eq!(format_uptime(3 * 86400), "3.0 days");
    }

    #[test]
    fn test_render_collector_table() {
        let statuses = vec![CollectorStatus {
            name: "coverage",
            success: false,
            duration_seconds: 0.0125,
        }];
        let table = render_collector_table(&statuses, 4);
        assert!(table.contains("coverage"));
        assert!(table.contains("failed"));
        assert!(table.contains("12.500"));
        assert!(table.contains("Scrapes served: 4"));
    }
}
