//! ovs-coverage-exporter - Prometheus exporter for Open vSwitch coverage counters.
//!
//! Every scrape of the metrics endpoint sends `coverage/show` to the daemon's
//! unixctl control socket, parses the report and exposes the known counters.

mod cli;
mod commands;
mod config;
mod handlers;
mod startup_checks;
mod state;

use axum::{routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use prometheus::{Gauge, Opts, Registry};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, level_filters::LevelFilter, warn};

use cli::{Args, Commands, LogLevel};
use commands::{build_registry, command_check, command_collect, command_config, command_metrics};
use config::{
    config_source, resolve_config, show_config, validate_effective_config, Config,
    DEFAULT_BIND_ADDR, DEFAULT_PORT,
};
use handlers::{health_handler, metrics_handler, root_handler};
use state::{AppState, SharedCollectors};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args, config: &Config) {
    let level = config.log_level();
    let log_level = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    // stdout is reserved for command output such as `collect`
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("⚠️  A tracing subscriber is already installed");
    }

    info!("Logging initialized with level: {}", level.as_str());
    match config_source(args) {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file, using defaults"),
    }
}

/// Resolves configuration, exiting with code 1 if a file or flag cannot be parsed.
fn resolve_or_exit(args: &Args) -> Config {
    match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Config {
    let config = resolve_or_exit(args);
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    config
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_or_exit(&args);

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    if let Some(command) = &args.command {
        // Generating a config file works without a valid one
        if let Commands::Config {
            output,
            format,
            commented,
        } = command
        {
            return command_config(output.clone(), format.clone(), *commented);
        }

        let config = load_validated_config(&args);
        setup_logging(&args, &config);

        return match command {
            Commands::Check { query } => command_check(*query, &config),
            Commands::Collect { iterations } => {
                command_collect(*iterations, &config).map_err(Into::into)
            }
            Commands::Metrics { enabled } => command_metrics(*enabled, &config),
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    let config = load_validated_config(&args);
    setup_logging(&args, &config);

    info!("Starting ovs-coverage-exporter");

    // A missing socket is not fatal: the daemon may come up after us
    match startup_checks::validate_requirements(&config.socket_location()) {
        Ok(socket) => info!("Using control socket {}", socket.display()),
        Err(e) => {
            warn!("Startup validation failed: {}", e);
            warn!("The exporter will start but scrapes fail until the daemon is reachable");
        }
    }

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);

    let collectors = Arc::new(build_registry(&config)?);
    for collector in collectors.collectors() {
        info!(
            "Collector '{}' enabled with metric sets [{}]",
            collector.name(),
            collector.metric_sets()
        );
    }

    let registry = Registry::new();
    registry.register(Box::new(SharedCollectors(collectors.clone())))?;

    let scrape_duration = Gauge::with_opts(Opts::new(
        "ovs_exporter_scrape_duration_seconds",
        "Time spent serving the last scrape",
    ))?;

    let state = Arc::new(AppState {
        registry,
        collectors,
        scrape_duration,
        config: Arc::new(config.clone()),
        start_time: Instant::now(),
    });

    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;
    let http_path = config.http_path().to_string();

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route(&http_path, get(metrics_handler));

    if config.enable_health.unwrap_or(true) {
        app = app.route("/health", get(health_handler));
    }

    let app = app.with_state(state);

    if config.enable_tls.unwrap_or(false) {
        // Both paths were checked by validate_effective_config()
        let (Some(cert_path), Some(key_path)) = (&config.tls_cert_path, &config.tls_key_path)
        else {
            return Err("enable_tls requires tls_cert_path and tls_key_path".into());
        };

        info!("Loading TLS certificate from: {}", cert_path);
        info!("Loading TLS private key from: {}", key_path);

        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .map_err(|e| {
                error!("Failed to load TLS configuration: {}", e);
                e
            })?;

        info!(
            "ovs-coverage-exporter listening on https://{}:{}{}",
            bind_ip_str, port, http_path
        );

        let server = axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service());

        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received, exiting...");
            }
        }
    } else {
        let listener = TcpListener::bind(addr).await?;
        info!(
            "ovs-coverage-exporter listening on http://{}:{}{}",
            bind_ip_str, port, http_path
        );

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        if let Err(e) = server.await {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    info!("ovs-coverage-exporter stopped gracefully");
    Ok(())
}
