//! Reporter: the sink the sample loop writes each formatted record to.

use tracing::info;

/// Sink for formatted sample records.
///
/// Implementations must tolerate being called from the sampling task's
/// thread. Status lines for the operator go through the console writer, not
/// through this trait; the reporter carries the data stream only.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
}

/// Reporter that writes records through the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!(target: "proctap::samples", "{}", message);
    }
}
