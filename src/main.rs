//! proctap - single-process performance counter sampler.
//!
//! Entry point: parses the CLI, resolves configuration, installs logging,
//! and hands control to the lifecycle controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};

use proctap::cli::{Args, LogLevel};
use proctap::config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_INTERVAL_MS,
    DEFAULT_PROC_ROOT,
};
use proctap::console::ConsoleWriter;
use proctap::error::MonitorError;
use proctap::monitor::{self, MonitorOptions};
use proctap::report::{Reporter, TracingReporter};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(_config: &Config, args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        show_config(&config, args.config_format)?;
        return Ok(());
    }

    let config = resolve_config(&args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config, &args);

    let Some(process_name) = config.process_name.clone() else {
        eprintln!("❌ {}", MonitorError::ConfigurationMissing);
        std::process::exit(1);
    };

    info!("Starting proctap");

    let options = MonitorOptions {
        process_name,
        interval: Duration::from_millis(config.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)),
        proc_root: config
            .proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT)),
    };

    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter::new());
    let console = ConsoleWriter::new();

    let outcome = monitor::run(&options, reporter, &console, monitor::wait_for_keypress()).await;

    info!("proctap stopped gracefully");
    std::process::exit(outcome.exit_code());
}
