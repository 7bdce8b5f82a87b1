// # statuswatchd - Status Page Monitor Daemon
//
// This daemon is a thin integration layer. All detection logic lives in
// statuswatch-core; this binary only:
// 1. Reads configuration (optional JSON file, then environment / flags)
// 2. Initializes logging and the runtime
// 3. Wires the HTTP fetcher and the console sink into a Monitor
// 4. Runs one cycle (`--test`) or polls until SIGTERM / SIGINT
//
// ## Configuration
//
// Precedence, lowest to highest: built-in defaults, `--config` file,
// environment variables, command-line flags.
//
// - `STATUSWATCH_BASE_URL` / `--base-url`: Status page root
// - `STATUSWATCH_INTERVAL` / `--interval`: Poll interval in seconds (1..=3600)
// - `STATUSWATCH_TIMEOUT` / `--timeout`: Per-request timeout in seconds
// - `STATUSWATCH_LOG_LEVEL` / `--log-level`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// statuswatchd --interval 60
// statuswatchd --test
// STATUSWATCH_BASE_URL=https://www.githubstatus.com statuswatchd
// ```

mod console;

use anyhow::{Context, Result};
use clap::Parser;
use console::ConsoleSink;
use statuswatch_core::{Monitor, MonitorConfig, MonitorEvent};
use statuswatch_http::HttpStatusFetcher;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum StatuswatchExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<StatuswatchExitCode> for ExitCode {
    fn from(code: StatuswatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "statuswatchd")]
#[command(about = "Status page monitor: reports component and incident changes")]
#[command(version)]
struct Args {
    /// Polling interval in seconds
    #[arg(
        short,
        long,
        env = "STATUSWATCH_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    interval: Option<u64>,

    /// Run one check cycle and exit
    #[arg(long)]
    test: bool,

    /// Status page base URL
    #[arg(long, env = "STATUSWATCH_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "STATUSWATCH_TIMEOUT")]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "STATUSWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// JSON file with monitor configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Build the monitor configuration from the file (if any) and overrides
    fn monitor_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => MonitorConfig::new(),
        };

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(interval) = self.interval {
            config = config.with_poll_interval_secs(interval);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_request_timeout_secs(timeout);
        }

        if !(1..=3600).contains(&config.poll_interval_secs) {
            anyhow::bail!(
                "Poll interval must be between 1 and 3600 seconds. Got: {}",
                config.poll_interval_secs
            );
        }

        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "Log level '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn load_config_file(path: &Path) -> Result<MonitorConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return StatuswatchExitCode::ConfigError.into();
        }
    };

    let config = match args.monitor_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return StatuswatchExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return StatuswatchExitCode::ConfigError.into();
    }

    info!("Starting statuswatchd against {}", config.base_url);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return StatuswatchExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, args.test).await {
            error!("Daemon error: {:#}", e);
            StatuswatchExitCode::RuntimeError
        } else {
            StatuswatchExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: MonitorConfig, test_mode: bool) -> Result<()> {
    let fetcher = HttpStatusFetcher::new(&config)?;
    let poll_interval = config.poll_interval_secs;

    let (mut monitor, event_rx) =
        Monitor::new(Box::new(fetcher), Box::new(ConsoleSink::new()), config)?;

    let events = tokio::spawn(log_lifecycle(event_rx));

    if test_mode {
        println!("Testing mode - running once...");
        let report = monitor.check_once().await;
        info!(
            "Check complete: {} component event(s), {} incident event(s)",
            report.component_events(),
            report.incident_events()
        );
    } else {
        println!("Status Monitor Started (polling every {}s)", poll_interval);
        println!("{}", "=".repeat(50));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Signal handler error: {:#}", e),
            }
            let _ = shutdown_tx.send(());
        });

        monitor.run_with_shutdown(shutdown_rx).await?;
        println!("\nMonitor stopped");
    }

    // Dropping the monitor closes the lifecycle channel
    drop(monitor);
    let _ = events.await;

    Ok(())
}

/// Forward lifecycle events to the debug log
async fn log_lifecycle(mut event_rx: mpsc::Receiver<MonitorEvent>) {
    while let Some(event) = event_rx.recv().await {
        debug!("Monitor event: {:?}", event);
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
