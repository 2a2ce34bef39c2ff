//! Process discovery and name resolution from a proc root.
//!
//! The proc root is normally `/proc`, but any directory with the same layout
//! works, which is how the tests drive the sampler.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Longest name the kernel keeps in `/proc/<pid>/comm` (TASK_COMM_LEN - 1).
pub const COMM_MAX_LEN: usize = 15;

/// Process entry representing a directory in the proc root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

impl ProcEntry {
    pub fn new(root: &Path, pid: u32) -> Self {
        Self {
            pid,
            proc_path: root.join(pid.to_string()),
        }
    }
}

/// Scans the proc root for entries with numeric names.
///
/// Nothing is filtered out besides non-process entries; an unreadable root
/// yields an empty list.
pub fn collect_proc_entries(root: &Path) -> Vec<ProcEntry> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read proc root {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(v) => v,
            None => continue,
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let pid: u32 = match name.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        out.push(ProcEntry {
            pid,
            proc_path: entry.path(),
        });
    }
    out
}

/// Reads the process name from `comm`.
///
/// When `comm` sits at the kernel truncation limit, the basename of the first
/// `cmdline` argument is used instead if it extends the truncated name.
/// Names are arbitrary bytes; invalid UTF-8 is replaced, never an error.
pub fn read_process_name(proc_path: &Path) -> io::Result<String> {
    let raw = fs::read(proc_path.join("comm"))?;
    let raw = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
    let comm = String::from_utf8_lossy(raw).into_owned();

    if raw.len() >= COMM_MAX_LEN {
        if let Some(full) = read_cmdline_basename(proc_path) {
            if full.starts_with(&comm) {
                return Ok(full);
            }
        }
    }

    Ok(comm)
}

/// Basename of argv[0], if `cmdline` is readable and non-empty.
fn read_cmdline_basename(proc_path: &Path) -> Option<String> {
    let content = fs::read(proc_path.join("cmdline")).ok()?;
    let argv0 = content.split(|&b| b == 0u8).next()?;
    if argv0.is_empty() {
        return None;
    }
    Path::new(OsStr::from_bytes(argv0))
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collect_proc_entries_skips_non_numeric() {
        let dir = tempdir().expect("Failed to create temp dir");
        for name in ["1", "42", "self", "sys", "4a", "1000"] {
            fs::create_dir(dir.path().join(name)).expect("Failed to create dir");
        }
        fs::write(dir.path().join("uptime"), "1.0 2.0").expect("Failed to write file");

        let mut pids: Vec<u32> = collect_proc_entries(dir.path())
            .into_iter()
            .map(|e| e.pid)
            .collect();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 42, 1000]);
    }

    #[test]
    fn test_collect_proc_entries_missing_root() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(collect_proc_entries(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_read_process_name_from_comm() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("comm"), "gnome-shell\n").expect("Failed to write comm");
        assert_eq!(read_process_name(dir.path()).unwrap(), "gnome-shell");
    }

    #[test]
    fn test_read_process_name_truncated_comm_uses_cmdline() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("comm"), "gsd-housekeepin\n").expect("Failed to write comm");
        fs::write(
            dir.path().join("cmdline"),
            b"/usr/libexec/gsd-housekeeping\0--verbose\0",
        )
        .expect("Failed to write cmdline");
        assert_eq!(read_process_name(dir.path()).unwrap(), "gsd-housekeeping");
    }

    #[test]
    fn test_read_process_name_truncated_comm_unrelated_cmdline() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("comm"), "kworker/u16:3-ev\n").expect("Failed to write comm");
        fs::write(dir.path().join("cmdline"), b"").expect("Failed to write cmdline");
        assert_eq!(read_process_name(dir.path()).unwrap(), "kworker/u16:3-ev");
    }

    #[test]
    fn test_read_process_name_invalid_utf8() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("comm"), b"caf\xe9\n").expect("Failed to write comm");
        assert_eq!(read_process_name(dir.path()).unwrap(), "caf\u{FFFD}");
    }

    #[test]
    fn test_read_process_name_gone() {
        let dir = tempdir().expect("Failed to create temp dir");
        let err = read_process_name(&dir.path().join("123")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
