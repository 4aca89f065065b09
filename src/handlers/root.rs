//! Root endpoint handler for the landing page.
//!
//! This module provides the `/` endpoint handler that displays
//! a landing page with all available endpoints and descriptions.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tracing::{debug, instrument};

use crate::state::SharedState;

/// Git revision the binary was built from, if known.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");

    let version = env!("CARGO_PKG_VERSION");
    let uptime_secs = state.start_time.elapsed().as_secs();
    let uptime_str = format!(
        "{}h {}m {}s",
        uptime_secs / 3600,
        (uptime_secs % 3600) / 60,
        uptime_secs % 60
    );

    let metrics_path = state.config.http_path();
    let sets = state.config.metric_sets();
    let collectors = state.config.collector_names().join(", ");

    let health_item = if state.config.enable_health.unwrap_or(true) {
        r#"<li><a href="/health">/health</a> - last collector results (text)</li>"#
    } else {
        ""
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>OVS Coverage Exporter</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; }}
        code {{ background: #e9ecef; padding: 2px 6px; border-radius: 3px; }}
    </style>
</head>
<body>
    <h1>OVS Coverage Exporter</h1>
    <p>Version <code>{version}</code> ({git_sha}), up {uptime}</p>
    <p>Collectors: <code>{collectors}</code> - metric sets: <code>{sets}</code></p>
    <ul>
        <li><a href="{metrics_path}">{metrics_path}</a> - Prometheus metrics</li>
        {health_item}
    </ul>
</body>
</html>"#,
        version = version,
        git_sha = GIT_SHA,
        uptime = uptime_str,
        collectors = collectors,
        sets = sets,
        metrics_path = metrics_path,
        health_item = health_item,
    );

    Html(html)
}
