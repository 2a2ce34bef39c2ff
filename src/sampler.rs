//! Per-process sampling.
//!
//! A process that disappears, or lacks one of the files we read, is skipped for
//! the current cycle only. Everything else is a hard error.

use std::io;
use tracing::debug;

use crate::process::{
    read_oom_value, read_smaps_totals, read_statm, MemoryInfo, OomControl, ProcEntry,
    OOM_ADJ, OOM_SCORE, OOM_SCORE_ADJ, PAGE_SIZE,
};

/// One fully-read sample of a watched process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub pid: u32,
    pub memory: MemoryInfo,
    pub oom: OomControl,
}

/// Result of trying to sample a single process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    Sample(Sample),
    /// The process exited before all of its fields were read.
    ProcessGone,
    /// The process is alive but one of the files is missing.
    FieldUnavailable,
}

impl SampleOutcome {
    pub fn into_sample(self) -> Option<Sample> {
        match self {
            SampleOutcome::Sample(s) => Some(s),
            _ => None,
        }
    }
}

/// Errors that abort the sampler.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("failed to read {what} of pid {pid}: {source}")]
    Read {
        pid: u32,
        what: &'static str,
        #[source]
        source: io::Error,
    },
}

/// True for errors meaning the process (or the file) is no longer there.
pub fn is_gone(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(libc::ESRCH)
}

/// Turns a read failure into a skip outcome or a fatal error.
pub(crate) fn skip_or_fail(
    entry: &ProcEntry,
    what: &'static str,
    err: io::Error,
) -> Result<SampleOutcome, SampleError> {
    if !is_gone(&err) {
        return Err(SampleError::Read {
            pid: entry.pid,
            what,
            source: err,
        });
    }

    if entry.proc_path.exists() {
        debug!("Skipping pid {}: {} unavailable", entry.pid, what);
        Ok(SampleOutcome::FieldUnavailable)
    } else {
        debug!("Skipping pid {}: process gone while reading {}", entry.pid, what);
        Ok(SampleOutcome::ProcessGone)
    }
}

/// Reads memory accounting and OOM values for a process already matched by name.
pub fn sample_process(entry: &ProcEntry, name: &str) -> Result<SampleOutcome, SampleError> {
    let path = entry.proc_path.as_path();

    let statm = match read_statm(path) {
        Ok(v) => v,
        Err(e) => return skip_or_fail(entry, "statm", e),
    };
    let smaps = match read_smaps_totals(path) {
        Ok(v) => v,
        Err(e) => return skip_or_fail(entry, "smaps", e),
    };

    let oom_adj = match read_oom_value(path, OOM_ADJ) {
        Ok(v) => v,
        Err(e) => return skip_or_fail(entry, OOM_ADJ, e),
    };
    let oom_score = match read_oom_value(path, OOM_SCORE) {
        Ok(v) => v,
        Err(e) => return skip_or_fail(entry, OOM_SCORE, e),
    };
    let oom_score_adj = match read_oom_value(path, OOM_SCORE_ADJ) {
        Ok(v) => v,
        Err(e) => return skip_or_fail(entry, OOM_SCORE_ADJ, e),
    };

    Ok(SampleOutcome::Sample(Sample {
        name: name.to_string(),
        pid: entry.pid,
        memory: MemoryInfo::from_parts(&statm, &smaps, *PAGE_SIZE),
        oom: OomControl {
            oom_adj,
            oom_score,
            oom_score_adj,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_process(dir: &Path, oom: (i32, i32, i32)) {
        fs::create_dir_all(dir).expect("Failed to create process dir");
        fs::write(dir.join("statm"), "300 200 50 10 0 100 0\n").expect("Failed to write statm");
        fs::write(
            dir.join("smaps_rollup"),
            "Pss: 400 kB\nPrivate_Clean: 100 kB\nPrivate_Dirty: 200 kB\nSwap: 8 kB\n",
        )
        .expect("Failed to write smaps_rollup");
        fs::write(dir.join(OOM_ADJ), format!("{}\n", oom.0)).expect("Failed to write oom_adj");
        fs::write(dir.join(OOM_SCORE), format!("{}\n", oom.1)).expect("Failed to write oom_score");
        fs::write(dir.join(OOM_SCORE_ADJ), format!("{}\n", oom.2))
            .expect("Failed to write oom_score_adj");
    }

    #[test]
    fn test_sample_process_reads_all_fields() {
        let root = tempdir().expect("Failed to create temp dir");
        let entry = ProcEntry::new(root.path(), 100);
        write_process(&entry.proc_path, (-3, 50, -200));

        let sample = sample_process(&entry, "gnome-shell")
            .unwrap()
            .into_sample()
            .expect("expected a sample");

        assert_eq!(sample.name, "gnome-shell");
        assert_eq!(sample.pid, 100);
        assert_eq!(
            sample.oom,
            OomControl {
                oom_adj: -3,
                oom_score: 50,
                oom_score_adj: -200,
            }
        );
        assert_eq!(sample.memory.vms, 300 * *PAGE_SIZE);
        assert_eq!(sample.memory.rss, 200 * *PAGE_SIZE);
        assert_eq!(sample.memory.pss, 400 * 1024);
        assert_eq!(sample.memory.uss, 300 * 1024);
        assert_eq!(sample.memory.swap, 8 * 1024);
    }

    #[test]
    fn test_sample_process_gone() {
        let root = tempdir().expect("Failed to create temp dir");
        let entry = ProcEntry::new(root.path(), 4242);

        let outcome = sample_process(&entry, "python3").unwrap();
        assert_eq!(outcome, SampleOutcome::ProcessGone);
    }

    #[test]
    fn test_sample_process_missing_control_file() {
        let root = tempdir().expect("Failed to create temp dir");
        let entry = ProcEntry::new(root.path(), 7);
        write_process(&entry.proc_path, (0, 0, 0));
        fs::remove_file(entry.proc_path.join(OOM_ADJ)).expect("Failed to remove oom_adj");

        let outcome = sample_process(&entry, "ollama").unwrap();
        assert_eq!(outcome, SampleOutcome::FieldUnavailable);
    }

    #[test]
    fn test_sample_process_malformed_value_is_fatal() {
        let root = tempdir().expect("Failed to create temp dir");
        let entry = ProcEntry::new(root.path(), 9);
        write_process(&entry.proc_path, (0, 0, 0));
        fs::write(entry.proc_path.join(OOM_SCORE), "not-a-number\n")
            .expect("Failed to write oom_score");

        let err = sample_process(&entry, "stress-ng").unwrap_err();
        let SampleError::Read { pid, what, .. } = err;
        assert_eq!(pid, 9);
        assert_eq!(what, OOM_SCORE);
    }

    #[test]
    fn test_is_gone() {
        assert!(is_gone(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(is_gone(&io::Error::from_raw_os_error(libc::ESRCH)));
        assert!(!is_gone(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_gone(&io::Error::from(io::ErrorKind::InvalidData)));
    }
}
