//! Process resolution against the /proc filesystem.
//!
//! Scans the proc root for numeric PID entries and matches them by name so a
//! monitoring target can be resolved once, before any counter is bound. The
//! target is never re-resolved during a run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

/// A resolved monitoring target: one live process entry under the proc root.
#[derive(Debug, Clone)]
pub struct ProcessTarget {
    pub pid: u32,
    pub name: String,
    pub proc_path: PathBuf,
}

/// Scans the proc root for processes whose name matches `name` exactly.
///
/// Matching uses the comm name with a cmdline fallback. Entries that
/// disappear mid-scan are skipped. Results are sorted by PID so callers see
/// a stable order.
pub fn find_processes_by_name(root: &Path, name: &str) -> Vec<ProcessTarget> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let p = entry.path();
            let dir_name = match p.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if !dir_name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let pid: u32 = match dir_name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            match read_process_name(&p) {
                Some(n) if n == name => out.push(ProcessTarget {
                    pid,
                    name: n,
                    proc_path: p,
                }),
                _ => {}
            }
        }
    }
    out.sort_by_key(|t| t.pid);
    out
}

/// Resolves `name` to exactly one process.
///
/// Zero and multiple matches are both resolution failures; the caller (the
/// lifecycle controller) decides how each terminates the run.
pub fn resolve_target(root: &Path, name: &str) -> Result<ProcessTarget> {
    let mut matches = find_processes_by_name(root, name);
    match matches.len() {
        0 => Err(MonitorError::ProcessNotFound {
            name: name.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(MonitorError::AmbiguousProcess {
            name: name.to_string(),
            count,
        }),
    }
}

/// Reads a process name from its comm file, falling back to argv[0] of cmdline.
pub fn read_process_name(proc_path: &Path) -> Option<String> {
    let comm = proc_path.join("comm");
    if let Ok(s) = fs::read_to_string(&comm) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.into());
        }
    }

    let cmd = proc_path.join("cmdline");
    if let Ok(content) = fs::read(&cmd) {
        if !content.is_empty() {
            let parts: Vec<&str> = content
                .split(|&b| b == 0u8)
                .filter_map(|s| std::str::from_utf8(s).ok())
                .collect();
            if !parts.is_empty() {
                if let Some(name) = Path::new(parts[0]).file_name() {
                    return name.to_str().map(|s| s.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn add_process(root: &Path, pid: u32, name: &str) {
        let dir = root.join(pid.to_string());
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("comm"), format!("{}\n", name)).unwrap();
    }

    #[test]
    fn test_find_processes_exact_match_only() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 100, "nginx");
        add_process(tmp.path(), 200, "nginx-worker");
        add_process(tmp.path(), 300, "postgres");

        let found = find_processes_by_name(tmp.path(), "nginx");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pid, 100);
        assert_eq!(found[0].name, "nginx");
    }

    #[test]
    fn test_find_processes_multiple_matches_sorted_by_pid() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 412, "worker");
        add_process(tmp.path(), 87, "worker");

        let found = find_processes_by_name(tmp.path(), "worker");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].pid, 87);
        assert_eq!(found[1].pid, 412);
    }

    #[test]
    fn test_find_processes_no_match() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 100, "nginx");

        let found = find_processes_by_name(tmp.path(), "ghost");
        assert!(found.is_empty());
    }

    #[test]
    fn test_non_numeric_entries_are_ignored() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 100, "nginx");
        fs::create_dir(tmp.path().join("self")).unwrap();
        fs::write(tmp.path().join("self").join("comm"), "nginx\n").unwrap();

        let found = find_processes_by_name(tmp.path(), "nginx");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_resolve_target_single_match() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 100, "nginx");

        let target = resolve_target(tmp.path(), "nginx").unwrap();
        assert_eq!(target.pid, 100);
    }

    #[test]
    fn test_resolve_target_zero_matches() {
        let tmp = tempdir().unwrap();

        let err = resolve_target(tmp.path(), "ghost").unwrap_err();
        assert!(matches!(err, MonitorError::ProcessNotFound { .. }));
    }

    #[test]
    fn test_resolve_target_multiple_matches() {
        let tmp = tempdir().unwrap();
        add_process(tmp.path(), 100, "worker");
        add_process(tmp.path(), 200, "worker");

        let err = resolve_target(tmp.path(), "worker").unwrap_err();
        assert!(matches!(
            err,
            MonitorError::AmbiguousProcess { count: 2, .. }
        ));
    }

    #[test]
    fn test_read_process_name_cmdline_fallback() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("55");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("cmdline"), b"/usr/bin/redis-server\0--port\06379\0").unwrap();

        assert_eq!(read_process_name(&dir), Some("redis-server".to_string()));
    }
}
