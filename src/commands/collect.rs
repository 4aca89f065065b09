//! Collect command implementation.
//!
//! Runs the configured collectors and prints the exposition text, the same
//! output a scrape of the metrics endpoint would return.

use anyhow::Context;
use prometheus::{Encoder, Registry, TextEncoder};
use std::io::Write;
use std::time::Instant;

use crate::commands::build_registry;
use crate::config::Config;

/// Runs `iterations` collection rounds, printing every round to stdout.
pub fn command_collect(iterations: usize, config: &Config) -> anyhow::Result<()> {
    let registry = Registry::new();
    registry
        .register(Box::new(build_registry(config)?))
        .context("failed to register collectors")?;

    let encoder = TextEncoder::new();
    let stdout = std::io::stdout();

    for iteration in 1..=iterations {
        let start = Instant::now();
        let families = registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .context("failed to encode metrics")?;

        let mut out = stdout.lock();
        out.write_all(&buffer)?;
        out.flush()?;

        eprintln!(
            "🔄 Iteration {}/{}: {} metric families in {:.2}ms",
            iteration,
            iterations,
            families.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
