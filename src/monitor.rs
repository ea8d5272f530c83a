//! Lifecycle controller: resolve the target, bind counters, run the loop.
//!
//! This is the only place user-visible termination decisions are made.
//! Counter availability never reaches here (absorbed by the binder);
//! process-resolution failures do, and each maps to one exit outcome.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Color;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, info, warn};

use crate::catalog::ProcCatalog;
use crate::console::ConsoleWriter;
use crate::counters::bind_counters;
use crate::error::MonitorError;
use crate::process::resolve_target;
use crate::report::Reporter;
use crate::sampler;

/// Terminal outcome of a monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The loop ran and was stopped by the operator.
    Completed,
    /// Zero processes matched the configured name; the loop never started.
    ProcessNotFound,
    /// More than one process matched the configured name. Treated as fatal:
    /// monitoring an arbitrarily chosen match would be misleading, so the
    /// loop never starts.
    AmbiguousProcess,
}

impl ExitOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            ExitOutcome::Completed => 0,
            ExitOutcome::ProcessNotFound => 1,
            ExitOutcome::AmbiguousProcess => 2,
        }
    }
}

/// Effective settings for one monitoring run.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub process_name: String,
    pub interval: Duration,
    pub proc_root: PathBuf,
}

/// Runs the monitor to completion.
///
/// Resolves the target process, binds the available counters, starts the
/// sample loop and blocks on `stop_signal`. On the error outcomes the
/// signal is still awaited so the operator can acknowledge the message
/// before the process exits.
pub async fn run(
    options: &MonitorOptions,
    reporter: Arc<dyn Reporter>,
    console: &ConsoleWriter,
    stop_signal: impl Future<Output = ()>,
) -> ExitOutcome {
    console.write_line("Press any key to quit...", Color::Yellow);

    let target = match resolve_target(&options.proc_root, &options.process_name) {
        Ok(target) => target,
        Err(e) => {
            console.write_line(&format!("ERROR: {}", e), Color::Red);
            let outcome = match e {
                MonitorError::AmbiguousProcess { .. } => ExitOutcome::AmbiguousProcess,
                _ => ExitOutcome::ProcessNotFound,
            };
            stop_signal.await;
            return outcome;
        }
    };

    info!("Monitoring process '{}' (pid {})", target.name, target.pid);

    let catalog = ProcCatalog::new(&options.proc_root, target.pid);
    let counter_set = bind_counters(&catalog, &options.proc_root, &target);
    if counter_set.is_empty() {
        warn!("No performance counters available in this environment; emitting empty records");
    } else {
        debug!(
            "Bound {} counters: {:?}",
            counter_set.len(),
            counter_set.labels().collect::<Vec<_>>()
        );
    }

    let handle = sampler::start(options.interval, counter_set, reporter);

    stop_signal.await;
    debug!("Stop requested, waiting for the in-flight tick to finish");
    handle.stop().await;

    console.write_line("Done", Color::DarkCyan);
    ExitOutcome::Completed
}

/// Resolves once any key is pressed on the controlling terminal.
///
/// Raw mode is enabled only for the wait so a single keypress is delivered
/// without line buffering. When no terminal is attached (a pipe, a service
/// unit), falls back to waiting for Ctrl+C.
pub async fn wait_for_keypress() {
    let pressed = tokio::task::spawn_blocking(|| -> std::io::Result<()> {
        enable_raw_mode()?;
        let result = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
                Ok(_) => continue,
                Err(e) => break Err(e),
            }
        };
        let _ = disable_raw_mode();
        result
    })
    .await;

    match pressed {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!("Keyboard unavailable ({}), waiting for Ctrl+C instead", e);
            let _ = tokio::signal::ctrl_c().await;
        }
        Err(e) => {
            warn!("Keyboard wait task failed ({}), waiting for Ctrl+C instead", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
