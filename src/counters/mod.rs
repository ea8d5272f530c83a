//! Counter binding and the bound counter set.
//!
//! The candidate metrics are a static declarative table iterated once at
//! startup against the catalog's existence checks. A counter whose category
//! or name the environment does not expose is skipped, not an error: partial
//! observability beats failing the whole run. The resulting set is immutable
//! for the lifetime of the run and may legitimately be empty.

mod cpu;
mod memory;

pub use cpu::ProcessorTimeSource;
pub use memory::{AvailableMemorySource, WorkingSetSource};

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::catalog::{
    CounterCatalog, CATEGORY_MEMORY, CATEGORY_PROCESS, COUNTER_AVAILABLE_MBYTES,
    COUNTER_PROCESSOR_TIME, COUNTER_WORKING_SET,
};
use crate::process::ProcessTarget;

/// A live, read-only binding to one OS-exposed counter.
///
/// Sources are bound once at startup and only ever asked for the next raw
/// value; they are never rebound mid-run.
pub trait CounterSource: Send {
    fn next_value(&mut self) -> io::Result<f64>;
}

/// Which concrete source backs a candidate counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    WorkingSet,
    ProcessorTime,
    AvailableMemory,
}

/// One candidate metric: everything needed to probe and bind it.
pub struct CounterSpec {
    /// Display label, unique within a run. Table order is emit order.
    pub label: &'static str,
    pub category: &'static str,
    pub counter: &'static str,
    /// Whether the counter is scoped to the target process instance.
    pub per_instance: bool,
    /// Raw value mode: read the instantaneous/cumulative value, not a rate.
    pub raw: bool,
    /// Unit conversion applied to each reading before formatting.
    pub convert: fn(f64) -> f64,
    pub kind: CounterKind,
}

const BYTES_PER_MIB: f64 = 1_048_576.0;

fn identity(v: f64) -> f64 {
    v
}

fn bytes_to_mib(v: f64) -> f64 {
    v / BYTES_PER_MIB
}

/// Candidate counters, in priority (and emit) order.
pub const CANDIDATE_COUNTERS: &[CounterSpec] = &[
    CounterSpec {
        label: "Working Set",
        category: CATEGORY_PROCESS,
        counter: COUNTER_WORKING_SET,
        per_instance: true,
        raw: true,
        convert: bytes_to_mib,
        kind: CounterKind::WorkingSet,
    },
    CounterSpec {
        label: "CPU",
        category: CATEGORY_PROCESS,
        counter: COUNTER_PROCESSOR_TIME,
        per_instance: true,
        raw: true,
        convert: identity,
        kind: CounterKind::ProcessorTime,
    },
    CounterSpec {
        label: "Available Memory",
        category: CATEGORY_MEMORY,
        counter: COUNTER_AVAILABLE_MBYTES,
        per_instance: false,
        raw: true,
        convert: identity,
        kind: CounterKind::AvailableMemory,
    },
];

struct BoundCounter {
    label: String,
    convert: fn(f64) -> f64,
    source: Box<dyn CounterSource>,
}

/// The ordered set of successfully bound counters for a run.
///
/// Insertion order is emit order. Every label present has a live source;
/// labels for unavailable counters are simply absent. Nothing is added or
/// removed after construction.
#[derive(Default)]
pub struct CounterSet {
    counters: Vec<BoundCounter>,
}

/// One point-in-time reading of every bound counter, in set order.
pub type Sample = Vec<(String, f64)>;

impl CounterSet {
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        convert: fn(f64) -> f64,
        source: Box<dyn CounterSource>,
    ) {
        self.counters.push(BoundCounter {
            label: label.into(),
            convert,
            source,
        });
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counters.iter().map(|c| c.label.as_str())
    }

    /// Reads every counter once, in insertion order, applying each metric's
    /// unit conversion. A read failure on a live handle degrades that value
    /// to 0.0 rather than dropping the label from the sample.
    pub fn sample(&mut self) -> Sample {
        self.counters
            .iter_mut()
            .map(|c| {
                let raw = match c.source.next_value() {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("Failed to read counter '{}': {}", c.label, e);
                        0.0
                    }
                };
                (c.label.clone(), (c.convert)(raw))
            })
            .collect()
    }
}

/// Formats a sample as a single record: `Label: value;` per counter, in
/// sample order.
pub fn format_sample(sample: &Sample) -> String {
    let mut out = String::new();
    for (label, value) in sample {
        let _ = write!(out, "{}: {};", label, value);
    }
    out
}

/// Binds every candidate counter the catalog reports available for
/// `target`. Unavailable categories or counters are skipped silently.
pub fn bind_counters(
    catalog: &dyn CounterCatalog,
    root: &Path,
    target: &ProcessTarget,
) -> CounterSet {
    let mut set = CounterSet::default();
    for spec in CANDIDATE_COUNTERS {
        if !catalog.category_exists(spec.category) {
            debug!(
                "Counter category '{}' not present, skipping '{}'",
                spec.category, spec.label
            );
            continue;
        }
        if !catalog.counter_exists(spec.counter, spec.category) {
            debug!(
                "Counter '{}' not present in category '{}', skipping '{}'",
                spec.counter, spec.category, spec.label
            );
            continue;
        }
        let source: Box<dyn CounterSource> = match spec.kind {
            CounterKind::WorkingSet => Box::new(WorkingSetSource::new(&target.proc_path)),
            CounterKind::ProcessorTime => Box::new(ProcessorTimeSource::new(&target.proc_path)),
            CounterKind::AvailableMemory => Box::new(AvailableMemorySource::new(root)),
        };
        set.insert(spec.label, spec.convert, source);
    }
    set
}
