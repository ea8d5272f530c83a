//! Fixed-interval sample loop.
//!
//! One background task owns the counter set and drives the
//! read-convert-format-emit sequence once per interval. The tick body is
//! synchronous, so ticks are strictly sequential; a tick that overruns the
//! interval causes the next tick to be skipped, never run in parallel.
//! Cancellation is cooperative: an in-flight tick always completes, then the
//! done notification fires exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::counters::{format_sample, CounterSet};
use crate::report::Reporter;

/// Handle to a running sample loop.
///
/// Dropping the handle without calling [`SamplerHandle::stop`] also prevents
/// future ticks, but only `stop` waits for the loop to acknowledge.
pub struct SamplerHandle {
    cancel: Option<oneshot::Sender<()>>,
    done: oneshot::Receiver<()>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Stops the loop: no further ticks start, the tick in flight (if any)
    /// completes, and this returns once the loop's done notification has
    /// fired.
    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        let _ = self.done.await;
        let _ = self.task.await;
    }
}

/// Starts sampling `counter_set` every `interval`, emitting one formatted
/// record per tick through `reporter`.
///
/// The first tick fires one full interval after start. An empty counter set
/// is valid: the loop runs and emits empty records until stopped.
pub fn start(
    interval: Duration,
    mut counter_set: CounterSet,
    reporter: Arc<dyn Reporter>,
) -> SamplerHandle {
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let (done_tx, done_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => break,
                _ = ticker.tick() => {
                    let sample = counter_set.sample();
                    reporter.info(&format_sample(&sample));
                }
            }
        }

        debug!("Sample loop stopped");
        let _ = done_tx.send(());
    });

    SamplerHandle {
        cancel: Some(cancel_tx),
        done: done_rx,
        task,
    }
}
