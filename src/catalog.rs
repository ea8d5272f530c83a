//! Counter catalog: existence queries against the OS counter registry.
//!
//! On Linux the registry is the proc filesystem. A counter category exists
//! when its backing proc entry exists; a counter exists when the file that
//! would be read for it is present and carries the relevant field. The
//! binder only constructs a handle after both queries answer true, so an
//! environment missing a whole category (a hidepid mount, a vanished
//! process) degrades to a smaller counter set instead of an error.

use std::fs;
use std::path::{Path, PathBuf};

/// Category of per-process counters, backed by `/proc/<pid>/`.
pub const CATEGORY_PROCESS: &str = "Process";
/// Category of system-wide memory counters, backed by `/proc/meminfo`.
pub const CATEGORY_MEMORY: &str = "Memory";

pub const COUNTER_WORKING_SET: &str = "Working Set";
pub const COUNTER_PROCESSOR_TIME: &str = "% Processor Time";
pub const COUNTER_AVAILABLE_MBYTES: &str = "Available Mbytes";

/// Existence queries against the set of counters the environment exposes.
///
/// Implementations must be pure queries: no side effects, no binding, cheap
/// enough to call once per candidate counter at startup.
pub trait CounterCatalog {
    fn category_exists(&self, category: &str) -> bool;
    fn counter_exists(&self, counter: &str, category: &str) -> bool;
}

/// Catalog backed by a proc tree, scoped to one target process.
pub struct ProcCatalog {
    root: PathBuf,
    pid: u32,
}

impl ProcCatalog {
    pub fn new(root: &Path, pid: u32) -> Self {
        Self {
            root: root.to_path_buf(),
            pid,
        }
    }

    fn pid_dir(&self) -> PathBuf {
        self.root.join(self.pid.to_string())
    }
}

impl CounterCatalog for ProcCatalog {
    fn category_exists(&self, category: &str) -> bool {
        match category {
            CATEGORY_PROCESS => self.pid_dir().is_dir(),
            CATEGORY_MEMORY => self.root.join("meminfo").is_file(),
            _ => false,
        }
    }

    fn counter_exists(&self, counter: &str, category: &str) -> bool {
        match (category, counter) {
            (CATEGORY_PROCESS, COUNTER_WORKING_SET) => {
                file_has_line_prefix(&self.pid_dir().join("status"), "VmRSS:")
            }
            (CATEGORY_PROCESS, COUNTER_PROCESSOR_TIME) => self.pid_dir().join("stat").is_file(),
            (CATEGORY_MEMORY, COUNTER_AVAILABLE_MBYTES) => {
                file_has_line_prefix(&self.root.join("meminfo"), "MemAvailable:")
            }
            _ => false,
        }
    }
}

/// True when `path` is readable and one of its lines starts with `prefix`.
fn file_has_line_prefix(path: &Path, prefix: &str) -> bool {
    fs::read_to_string(path)
        .map(|s| s.lines().any(|l| l.starts_with(prefix)))
        .unwrap_or(false)
}
