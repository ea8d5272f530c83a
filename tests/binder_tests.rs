//! Integration tests for counter discovery and binding.
//!
//! Each test builds a fixture proc tree with tempfile and checks which
//! candidate counters survive binding: exactly the labels whose category and
//! counter both exist at bind time, never a label with a missing handle.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use proctap::catalog::ProcCatalog;
use proctap::counters::bind_counters;
use proctap::process::ProcessTarget;

const PID: u32 = 42;

struct Fixture {
    tmp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { tmp: tempdir().unwrap() }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn pid_dir(&self) -> PathBuf {
        self.root().join(PID.to_string())
    }

    fn with_process(self, vmrss_kb: u64) -> Self {
        fs::create_dir(self.pid_dir()).unwrap();
        fs::write(self.pid_dir().join("comm"), "nginx\n").unwrap();
        fs::write(
            self.pid_dir().join("status"),
            format!("Name:\tnginx\nVmRSS:\t  {} kB\n", vmrss_kb),
        )
        .unwrap();
        fs::write(
            self.pid_dir().join("stat"),
            "42 (nginx) S 1 42 42 0 -1 4194304 500 0 0 0 200 100 0 0 20 0 1 0 12345 1000000 256",
        )
        .unwrap();
        self
    }

    fn with_meminfo(self, available_kb: u64) -> Self {
        fs::write(
            self.root().join("meminfo"),
            format!(
                "MemTotal: 16337000 kB\nMemFree: 1000000 kB\nMemAvailable: {} kB\n",
                available_kb
            ),
        )
        .unwrap();
        self
    }

    fn target(&self) -> ProcessTarget {
        ProcessTarget {
            pid: PID,
            name: "nginx".to_string(),
            proc_path: self.pid_dir(),
        }
    }

    fn bind(&self) -> proctap::counters::CounterSet {
        let catalog = ProcCatalog::new(self.root(), PID);
        bind_counters(&catalog, self.root(), &self.target())
    }
}

#[test]
fn full_environment_binds_all_three_counters() {
    let fx = Fixture::new().with_process(4096).with_meminfo(8_192_000);

    let set = fx.bind();
    let labels: Vec<&str> = set.labels().collect();
    assert_eq!(labels, vec!["Working Set", "CPU", "Available Memory"]);
}

#[test]
fn missing_process_category_keeps_memory_counter() {
    // No pid dir at all: the whole "Process" category is absent, yet the
    // run must still observe system memory.
    let fx = Fixture::new().with_meminfo(8_192_000);

    let set = fx.bind();
    let labels: Vec<&str> = set.labels().collect();
    assert_eq!(labels, vec!["Available Memory"]);
}

#[test]
fn missing_memory_category_keeps_process_counters() {
    let fx = Fixture::new().with_process(4096);

    let set = fx.bind();
    let labels: Vec<&str> = set.labels().collect();
    assert_eq!(labels, vec!["Working Set", "CPU"]);
}

#[test]
fn status_without_vmrss_skips_working_set_only() {
    let fx = Fixture::new().with_process(4096).with_meminfo(8_192_000);
    // Rewrite status the way a kernel thread reports it: no VmRSS line.
    fs::write(fx.pid_dir().join("status"), "Name:\tnginx\n").unwrap();

    let set = fx.bind();
    let labels: Vec<&str> = set.labels().collect();
    assert_eq!(labels, vec!["CPU", "Available Memory"]);
}

#[test]
fn missing_stat_skips_cpu_only() {
    let fx = Fixture::new().with_process(4096).with_meminfo(8_192_000);
    fs::remove_file(fx.pid_dir().join("stat")).unwrap();

    let set = fx.bind();
    let labels: Vec<&str> = set.labels().collect();
    assert_eq!(labels, vec!["Working Set", "Available Memory"]);
}

#[test]
fn barren_environment_yields_an_empty_set() {
    let fx = Fixture::new();

    let set = fx.bind();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}

#[test]
fn bound_sources_read_fixture_values_with_conversion() {
    let fx = Fixture::new().with_process(4096).with_meminfo(8_192_000);

    let mut set = fx.bind();
    let sample = set.sample();

    // VmRSS 4096 kB -> 4194304 bytes -> 4 MiB after the working-set divide.
    assert_eq!(sample[0], ("Working Set".to_string(), 4.0));
    // MemAvailable 8192000 kB -> 8000 MB, no conversion.
    assert_eq!(sample[2], ("Available Memory".to_string(), 8000.0));
    // CPU depends on the host clock tick; it only needs to be positive here.
    assert_eq!(sample[1].0, "CPU");
    assert!(sample[1].1 > 0.0);
}
