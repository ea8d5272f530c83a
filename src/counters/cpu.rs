//! Processor time source backed by /proc/<pid>/stat.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use super::CounterSource;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100.0
}

/// System clock ticks per second (for CPU time calculation).
static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// Cumulative processor time of the target process, in seconds.
///
/// Raw value mode: each reading is the monotonic utime+stime total from
/// /proc/<pid>/stat, not a precomputed rate.
pub struct ProcessorTimeSource {
    stat_path: PathBuf,
}

impl ProcessorTimeSource {
    pub fn new(proc_path: &Path) -> Self {
        Self {
            stat_path: proc_path.join("stat"),
        }
    }
}

impl CounterSource for ProcessorTimeSource {
    fn next_value(&mut self) -> io::Result<f64> {
        let content = fs::read_to_string(&self.stat_path)?;
        parse_cpu_time_seconds(&content)
    }
}

/// Parse total CPU time (user+system) in seconds from a stat line.
fn parse_cpu_time_seconds(content: &str) -> io::Result<f64> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() <= 14 {
        return Err(io::Error::other("Invalid stat format"));
    }

    let utime: f64 = parts[13].parse().unwrap_or(0.0);
    let stime: f64 = parts[14].parse().unwrap_or(0.0);

    Ok((utime + stime) / *CLK_TCK)
}
