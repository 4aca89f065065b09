//! Configuration management for ovs-coverage-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use ovs_coverage_exporter::collectors::AVAILABLE_COLLECTORS;
use ovs_coverage_exporter::{MetricSets, SocketLocation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 1981;
pub const DEFAULT_HTTP_PATH: &str = "/metrics";
pub const DEFAULT_OVS_RUNDIR: &str = ovs_coverage_exporter::appctl::DEFAULT_RUNDIR;
pub const DEFAULT_OVS_TARGET: &str = ovs_coverage_exporter::appctl::DEFAULT_TARGET;
pub const DEFAULT_APPCTL_TIMEOUT_MS: u64 = 5000;

/// Exporter configuration. Unset fields fall back to the defaults above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,
    #[serde(alias = "http-path")]
    pub http_path: Option<String>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    // Control socket
    #[serde(alias = "ovs-rundir")]
    pub ovs_rundir: Option<PathBuf>,
    #[serde(alias = "ovs-target")]
    pub ovs_target: Option<String>,
    /// Overrides pidfile based socket discovery
    #[serde(alias = "ovs-socket")]
    pub ovs_socket: Option<PathBuf>,
    #[serde(alias = "appctl-timeout-ms")]
    pub appctl_timeout_ms: Option<u64>,

    // Metrics collection
    pub collectors: Option<Vec<String>>,
    #[serde(alias = "metric-sets")]
    pub metric_sets: Option<MetricSets>,

    // Feature flags
    #[serde(alias = "enable-health")]
    pub enable_health: Option<bool>,
    #[serde(alias = "enable-telemetry")]
    pub enable_telemetry: Option<bool>,

    // TLS/SSL Configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            http_path: Some(DEFAULT_HTTP_PATH.to_string()),
            log_level: Some("info".into()),
            ovs_rundir: Some(PathBuf::from(DEFAULT_OVS_RUNDIR)),
            ovs_target: Some(DEFAULT_OVS_TARGET.to_string()),
            ovs_socket: None,
            appctl_timeout_ms: Some(DEFAULT_APPCTL_TIMEOUT_MS),
            collectors: Some(
                AVAILABLE_COLLECTORS
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            ),
            metric_sets: Some(MetricSets::default()),
            enable_health: Some(true),
            enable_telemetry: Some(true),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Config {
    /// Effective log level. Unknown names are rejected by validation.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|level| LogLevel::from_str(level, true).ok())
            .unwrap_or(LogLevel::Info)
    }

    pub fn http_path(&self) -> &str {
        self.http_path.as_deref().unwrap_or(DEFAULT_HTTP_PATH)
    }

    /// Where the control socket of the queried daemon lives.
    pub fn socket_location(&self) -> SocketLocation {
        match &self.ovs_socket {
            Some(path) => SocketLocation::Path(path.clone()),
            None => SocketLocation::PidFile {
                rundir: self
                    .ovs_rundir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OVS_RUNDIR)),
                target: self
                    .ovs_target
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OVS_TARGET.to_string()),
            },
        }
    }

    pub fn appctl_timeout(&self) -> Duration {
        Duration::from_millis(self.appctl_timeout_ms.unwrap_or(DEFAULT_APPCTL_TIMEOUT_MS))
    }

    pub fn collector_names(&self) -> Vec<String> {
        self.collectors.clone().unwrap_or_else(|| {
            AVAILABLE_COLLECTORS
                .iter()
                .map(|c| c.to_string())
                .collect()
        })
    }

    pub fn metric_sets(&self) -> MetricSets {
        self.metric_sets.clone().unwrap_or_default()
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Unknown log_level '{}', expected one of: off, error, warn, info, debug, trace",
                level
            )
            .into());
        }
    }

    let http_path = cfg.http_path();
    if !http_path.starts_with('/') {
        return Err(format!("http_path must start with '/', got '{}'", http_path).into());
    }
    if http_path == "/" || http_path == "/health" {
        return Err(format!("http_path '{}' collides with a built-in endpoint", http_path).into());
    }

    if cfg.appctl_timeout_ms == Some(0) {
        return Err("appctl_timeout_ms must be greater than 0".into());
    }

    if cfg.ovs_target.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err("ovs_target must not be empty".into());
    }

    // Collectors: known names only, at least one
    let collectors = cfg.collector_names();
    if collectors.is_empty() {
        return Err("At least one collector must be enabled".into());
    }
    for name in &collectors {
        if !AVAILABLE_COLLECTORS.contains(&name.trim()) {
            return Err(format!(
                "Unknown collector '{}', expected one of: {}",
                name,
                AVAILABLE_COLLECTORS.join(", ")
            )
            .into());
        }
    }

    if cfg.metric_sets().is_empty() {
        return Err("At least one metric set must be enabled".into());
    }

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

/// Checks that a TLS file exists, is readable and is not empty.
fn check_pem_file(path: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("TLS {} file not found: {}", what, path).into());
    }
    match fs::metadata(p) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", what, path).into()),
        Err(e) => {
            Err(format!("TLS {} file is not readable: {} ({})", what, path, e).into())
        }
        Ok(_) => Ok(()),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Override with CLI args
    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }
    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }
    if let Some(path) = &args.http_path {
        config.http_path = Some(path.clone());
    }

    // Control socket
    if let Some(rundir) = &args.ovs_rundir {
        config.ovs_rundir = Some(rundir.clone());
    }
    if let Some(target) = &args.ovs_target {
        config.ovs_target = Some(target.clone());
    }
    if let Some(socket) = &args.ovs_socket {
        config.ovs_socket = Some(socket.clone());
    }
    if let Some(timeout) = args.appctl_timeout_ms {
        config.appctl_timeout_ms = Some(timeout);
    }

    // Parse comma-separated collectors and metric sets
    if let Some(collectors) = &args.collectors {
        config.collectors = Some(
            collectors
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }
    if let Some(sets) = &args.metric_sets {
        config.metric_sets = Some(MetricSets::parse_list(sets)?);
    }

    // Feature flags
    if args.disable_health {
        config.enable_health = Some(false);
    }
    if args.disable_telemetry {
        config.enable_telemetry = Some(false);
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Config file that [`resolve_config`] reads for `args`, if any.
pub fn config_source(args: &Args) -> Option<PathBuf> {
    if args.no_config {
        None
    } else {
        locate_config(args.config.as_deref())
    }
}

/// Returns `path`, or the first default location that exists.
fn locate_config(path: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = path {
        return Some(p.to_path_buf());
    }

    let defaults = [
        "/etc/ovs-coverage-exporter.yaml",
        "/etc/ovs-coverage-exporter.yml",
        "/etc/ovs-coverage-exporter.json",
        "./ovs-coverage-exporter.yaml",
        "./ovs-coverage-exporter.yml",
        "./ovs-coverage-exporter.json",
    ];
    defaults
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Loads configuration from `path`, or from the first default location that exists.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = locate_config(path) else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        // Default to YAML
        _ => Ok(serde_yaml::from_str(&content)?),
    }
}

/// Renders configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
