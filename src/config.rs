//! Configuration management for proctap.
//!
//! This module handles loading, merging, and validating configuration from
//! files and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// On-disk configuration. Every field is optional; CLI flags win over file
/// values, file values win over defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the process to monitor.
    #[serde(alias = "process-name")]
    pub process_name: Option<String>,

    /// Sampling interval in milliseconds.
    #[serde(alias = "interval-ms")]
    pub interval_ms: Option<u64>,

    /// Log level for diagnostic output.
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    /// Root of the proc filesystem.
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_name: None,
            interval_ms: Some(DEFAULT_INTERVAL_MS),
            log_level: Some("info".into()),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if cfg.interval_ms == Some(0) {
        return Err(MonitorError::Config(
            "interval_ms must be greater than zero".into(),
        ));
    }
    if let Some(root) = &cfg.proc_root {
        if root.as_os_str().is_empty() {
            return Err(MonitorError::Config("proc_root must not be empty".into()));
        }
    }
    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(process) = &args.process {
        config.process_name = Some(process.clone());
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = Some(interval_ms);
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = path {
        p.to_path_buf()
    } else {
        // Try default locations
        let defaults = [
            "/etc/proctap/proctap.yaml",
            "/etc/proctap/proctap.yml",
            "/etc/proctap/proctap.json",
            "./proctap.yaml",
            "./proctap.yml",
            "./proctap.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| MonitorError::Config(format!("{}: {}", path.display(), e)))?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)
                .map_err(|e| MonitorError::Config(format!("{}: {}", path.display(), e)))?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)
                .map_err(|e| MonitorError::Config(format!("{}: {}", path.display(), e)))?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<()> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| MonitorError::Config(e.to_string()))?,
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| MonitorError::Config(e.to_string()))?
        }
        ConfigFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| MonitorError::Config(e.to_string()))?
        }
    };

    println!("{output}");
    Ok(())
}
