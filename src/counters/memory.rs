//! Memory counter sources backed by /proc.
//!
//! Working set comes from the VmRSS line of `/proc/<pid>/status`, available
//! memory from the MemAvailable line of `/proc/meminfo`. Both files report
//! kilobytes; the sources normalize to the units their counters advertise
//! (bytes and megabytes respectively).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CounterSource;

/// Resident set size of the target process, in bytes.
pub struct WorkingSetSource {
    status_path: PathBuf,
}

impl WorkingSetSource {
    pub fn new(proc_path: &Path) -> Self {
        Self {
            status_path: proc_path.join("status"),
        }
    }
}

impl CounterSource for WorkingSetSource {
    fn next_value(&mut self) -> io::Result<f64> {
        let content = fs::read_to_string(&self.status_path)?;
        for line in content.lines() {
            if let Some(v) = line.strip_prefix("VmRSS:") {
                if let Some(kb) = parse_kb_value(v) {
                    return Ok(kb as f64 * 1024.0);
                }
            }
        }
        Err(io::Error::other("VmRSS not present in status file"))
    }
}

/// System-wide available memory, in megabytes.
pub struct AvailableMemorySource {
    meminfo_path: PathBuf,
}

impl AvailableMemorySource {
    pub fn new(root: &Path) -> Self {
        Self {
            meminfo_path: root.join("meminfo"),
        }
    }
}

impl CounterSource for AvailableMemorySource {
    fn next_value(&mut self) -> io::Result<f64> {
        let content = fs::read_to_string(&self.meminfo_path)?;
        for line in content.lines() {
            if let Some(v) = line.strip_prefix("MemAvailable:") {
                if let Some(kb) = parse_kb_value(v) {
                    return Ok(kb as f64 / 1024.0);
                }
            }
        }
        Err(io::Error::other("MemAvailable not present in meminfo"))
    }
}

/// Parses the numeric part of a `<value> kB` field.
fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
