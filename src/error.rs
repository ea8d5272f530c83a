//! Error types for proctap.
//!
//! Counter availability is deliberately not represented here: a counter the
//! environment does not expose is skipped at bind time, never surfaced as an
//! error. Only process resolution and configuration problems reach callers.

use thiserror::Error;

/// Errors raised while resolving the target or preparing a run.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Zero processes matched the configured name.
    #[error("no process found with name: {name}")]
    ProcessNotFound { name: String },

    /// More than one process matched the configured name.
    #[error("found {count} processes with name: {name}")]
    AmbiguousProcess { name: String, count: usize },

    /// No process name was supplied by the CLI or the config file.
    #[error("no process name configured; pass --process or set process_name in the config file")]
    ConfigurationMissing,

    /// The configuration could not be loaded or failed validation.
    #[error("configuration invalid: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
