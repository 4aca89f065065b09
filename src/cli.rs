//! CLI arguments and subcommands for ovs-coverage-exporter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "ovs-coverage-exporter",
    about = "Prometheus exporter for Open vSwitch coverage counters",
    long_about = "Prometheus exporter for Open vSwitch coverage counters.\n\n\
                  Queries ovs-vswitchd over its unixctl control socket on every scrape \
                  (coverage/show) and exposes each known counter as a Prometheus metric. \
                  Counters are grouped in metric sets that can be enabled individually.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// HTTP path serving the metrics
    #[arg(long)]
    pub http_path: Option<String>,

    /// Log level [default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Open vSwitch run directory holding pidfiles and control sockets
    #[arg(long)]
    pub ovs_rundir: Option<PathBuf>,

    /// Daemon whose control socket is queried
    #[arg(long)]
    pub ovs_target: Option<String>,

    /// Explicit control socket path (skips pidfile lookup)
    #[arg(long)]
    pub ovs_socket: Option<PathBuf>,

    /// Timeout for control socket requests in milliseconds
    #[arg(long)]
    pub appctl_timeout_ms: Option<u64>,

    /// Enabled collectors (comma-separated)
    #[arg(long)]
    pub collectors: Option<String>,

    /// Enabled metric sets (comma-separated: base,errors,perf,counters,debug)
    #[arg(long)]
    pub metric_sets: Option<String>,

    /// Disable /health endpoint
    #[arg(long)]
    pub disable_health: bool,

    /// Disable internal ovs_exporter_* metrics
    #[arg(long)]
    pub disable_telemetry: bool,

    /// Enable TLS/SSL for HTTPS
    #[arg(long)]
    pub enable_tls: bool,

    /// Path to TLS certificate file (PEM format)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Path to TLS private key file (PEM format)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and control socket access
    Check {
        /// Also run coverage/show against the daemon
        #[arg(long)]
        query: bool,
    },

    /// Run the collectors once and print the metrics
    Collect {
        /// Number of collection rounds
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// List the metrics known to the collectors
    Metrics {
        /// Only list metrics that are currently enabled
        #[arg(long)]
        enabled: bool,
    },
}
