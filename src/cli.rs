//! CLI arguments for proctap.
//!
//! Defines the command-line interface structure using the clap library.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "proctap",
    about = "Interval-based tap on OS performance counters for a single process",
    long_about = "Interval-based tap on OS performance counters for a single process.\n\n\
                  Resolves a running process by name, binds whichever /proc-backed \
                  counters the environment exposes, and logs one formatted sample \
                  line per interval until a key is pressed.",
    version
)]
pub struct Args {
    /// Name of the process to monitor
    #[arg(short = 'p', long)]
    pub process: Option<String>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Root of the proc filesystem (override for fixture trees)
    #[arg(long, hide = true)]
    pub proc_root: Option<PathBuf>,
}
