//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("ovs-coverage-exporter.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# OVS Coverage Exporter Configuration
# ====================================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 1981                   # HTTP port
# http_path: "/metrics"        # Path serving the metrics
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
#
# Control Socket
# --------------
# ovs_rundir: "/run/openvswitch"  # Directory holding <target>.pid and <target>.<pid>.ctl
# ovs_target: "ovs-vswitchd"      # Daemon to query
# ovs_socket: null                # Explicit socket path, skips the pidfile lookup
# appctl_timeout_ms: 5000         # Connect/read/write timeout per request
#
# Metrics Collection
# ------------------
# collectors: [coverage]       # Enabled collectors
# metric_sets:                 # base, errors, perf, counters, debug
#   - base
#   - errors
#   - perf
#   - counters
#
# Feature Flags
# -------------
# enable_health: true          # Enable /health endpoint
# enable_telemetry: true       # Export ovs_exporter_* metrics
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false            # Enable HTTPS (default: false)
# tls_cert_path: null          # Path to TLS certificate (PEM format)
# tls_key_path: null           # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}
