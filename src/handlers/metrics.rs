//! Metrics endpoint handler for Prometheus scraping.
//!
//! Every request gathers the registry, which runs all collectors against the
//! control socket. Collection blocks on socket I/O, so it runs on the
//! blocking thread pool.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::state::SharedState;

/// Initial buffer capacity for metrics encoding.
const BUFFER_CAP: usize = 64 * 1024;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed,
    CollectionPanicked,
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        let message = match self {
            MetricsError::EncodingFailed => "Failed to encode metrics",
            MetricsError::CollectionPanicked => "Metrics collection aborted",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// Gathers and encodes all metrics in the Prometheus text format.
pub fn render_metrics(state: &SharedState) -> Result<String, MetricsError> {
    let start = Instant::now();
    let mut families = state.registry.gather();

    // The scrape duration covers collection only; report it in this very scrape.
    state.scrape_duration.set(start.elapsed().as_secs_f64());
    if state.config.enable_telemetry.unwrap_or(true) {
        families.extend(prometheus::core::Collector::collect(&state.scrape_duration));
    }

    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    if let Err(e) = TextEncoder::new().encode(&families, &mut buffer) {
        error!("Failed to encode Prometheus metrics: {}", e);
        return Err(MetricsError::EncodingFailed);
    }

    debug!(
        "Metrics rendered: {} families, {} bytes, {:.3}ms",
        families.len(),
        buffer.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    String::from_utf8(buffer).map_err(|_| MetricsError::EncodingFailed)
}

/// Handler for the metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(State(state): State<SharedState>) -> Result<String, MetricsError> {
    debug!("Processing metrics request");

    tokio::task::spawn_blocking(move || render_metrics(&state))
        .await
        .map_err(|e| {
            error!("Metrics collection task failed: {}", e);
            MetricsError::CollectionPanicked
        })?
}
