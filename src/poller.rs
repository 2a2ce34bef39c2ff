//! One poll cycle: enumerate, filter against the watch list, sample.
//!
//! The [`Poller`] owns the ignore set for the lifetime of the run; nothing is
//! shared with other threads.

use ahash::AHashSet as HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

use crate::ignore::IgnoreSet;
use crate::process::{collect_proc_entries, read_process_name, read_start_ticks, ProcEntry};
use crate::sampler::{is_gone, sample_process, Sample, SampleError};
use crate::watch::WatchList;

/// A process whose name matched the watch list this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantProcess {
    pub entry: ProcEntry,
    pub name: String,
}

/// Counters for the most recent cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub enumerated: usize,
    pub already_ignored: usize,
    pub newly_ignored: usize,
    pub pruned: usize,
    pub relevant: usize,
    pub sampled: usize,
    pub skipped: usize,
}

pub struct Poller {
    proc_root: PathBuf,
    watch: WatchList,
    ignore: IgnoreSet,
    stats: PollStats,
}

impl Poller {
    pub fn new(proc_root: impl Into<PathBuf>, watch: WatchList) -> Self {
        Self {
            proc_root: proc_root.into(),
            watch,
            ignore: IgnoreSet::new(),
            stats: PollStats::default(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    pub fn watch_list(&self) -> &WatchList {
        &self.watch
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    pub fn last_stats(&self) -> PollStats {
        self.stats
    }

    /// Runs a full cycle and returns the samples that could be read.
    #[instrument(skip(self), level = "debug")]
    pub fn poll(&mut self) -> Result<Vec<Sample>, SampleError> {
        self.stats = PollStats::default();

        let entries = collect_proc_entries(&self.proc_root);
        self.stats.enumerated = entries.len();

        let live: HashSet<u32> = entries.iter().map(|e| e.pid).collect();
        self.stats.pruned = self.ignore.retain_live(&live);

        let relevant = self.filter_relevant(&entries)?;

        let mut samples = Vec::with_capacity(relevant.len());
        for proc in &relevant {
            match sample_process(&proc.entry, &proc.name)?.into_sample() {
                Some(s) => samples.push(s),
                None => self.stats.skipped += 1,
            }
        }
        self.stats.sampled = samples.len();

        debug!(
            "Poll cycle: {} enumerated, {} ignored ({} new, {} pruned), {} relevant, {} sampled",
            self.stats.enumerated,
            self.stats.already_ignored,
            self.stats.newly_ignored,
            self.stats.pruned,
            self.stats.relevant,
            self.stats.sampled
        );

        Ok(samples)
    }

    /// Returns the entries whose name is watched, growing the ignore set with
    /// those that are not.
    ///
    /// Ignored processes are not name-resolved, but their `stat` is still read
    /// to confirm the pid has not been reused. Entries that vanish while being
    /// looked at are dropped for this cycle without being ignored.
    pub fn filter_relevant(
        &mut self,
        entries: &[ProcEntry],
    ) -> Result<Vec<RelevantProcess>, SampleError> {
        let mut out = Vec::new();

        for entry in entries {
            let mut start_ticks = None;

            if self.ignore.contains_pid(entry.pid) {
                match read_start_ticks(&entry.proc_path) {
                    Ok(t) if self.ignore.check(entry.pid, t) => {
                        self.stats.already_ignored += 1;
                        continue;
                    }
                    Ok(t) => {
                        trace!("pid {} was reused, reconsidering", entry.pid);
                        start_ticks = Some(t);
                    }
                    Err(e) if is_gone(&e) => continue,
                    Err(e) => return Err(read_error(entry, "stat", e)),
                }
            }

            let name = match read_process_name(&entry.proc_path) {
                Ok(n) => n,
                Err(e) if is_gone(&e) => {
                    trace!("pid {} exited before its name was read", entry.pid);
                    continue;
                }
                Err(e) => return Err(read_error(entry, "comm", e)),
            };

            if !self.watch.matches(&name) {
                let ticks = match start_ticks {
                    Some(t) => t,
                    None => match read_start_ticks(&entry.proc_path) {
                        Ok(t) => t,
                        Err(e) if is_gone(&e) => continue,
                        Err(e) => return Err(read_error(entry, "stat", e)),
                    },
                };
                trace!("Ignoring pid {} ({})", entry.pid, name);
                self.ignore.insert(entry.pid, ticks);
                self.stats.newly_ignored += 1;
                continue;
            }

            out.push(RelevantProcess {
                entry: entry.clone(),
                name,
            });
        }

        self.stats.relevant = out.len();
        Ok(out)
    }
}

fn read_error(entry: &ProcEntry, what: &'static str, source: std::io::Error) -> SampleError {
    SampleError::Read {
        pid: entry.pid,
        what,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_stub(root: &Path, pid: u32, name: &str, start: u64) {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).expect("Failed to create process dir");
        fs::write(dir.join("comm"), format!("{}\n", name)).expect("Failed to write comm");
        fs::write(
            dir.join("stat"),
            format!(
                "{} ({}) S 1 1 1 0 -1 0 0 0 0 0 0 0 0 0 20 0 1 0 {} 0 0",
                pid, name, start
            ),
        )
        .expect("Failed to write stat");
    }

    #[test]
    fn test_filter_relevant_splits_watched_and_ignored() {
        let root = tempdir().expect("Failed to create temp dir");
        write_stub(root.path(), 10, "python3", 1);
        write_stub(root.path(), 11, "sshd", 2);

        let mut poller = Poller::new(root.path(), WatchList::default());
        let entries = collect_proc_entries(root.path());
        let relevant = poller.filter_relevant(&entries).unwrap();

        assert_eq!(relevant.len(), 1);
        assert_eq!(relevant[0].entry.pid, 10);
        assert_eq!(relevant[0].name, "python3");
        assert!(poller.ignore_set().contains_pid(11));
        assert!(!poller.ignore_set().contains_pid(10));
    }

    #[test]
    fn test_filter_relevant_skips_vanished_without_ignoring() {
        let root = tempdir().expect("Failed to create temp dir");
        let mut poller = Poller::new(root.path(), WatchList::default());

        let ghost = ProcEntry::new(root.path(), 99);
        let relevant = poller.filter_relevant(&[ghost]).unwrap();

        assert!(relevant.is_empty());
        assert!(poller.ignore_set().is_empty());
    }

    #[test]
    fn test_filter_relevant_unwatched_without_stat_is_not_ignored() {
        let root = tempdir().expect("Failed to create temp dir");
        let dir = root.path().join("12");
        fs::create_dir_all(&dir).expect("Failed to create process dir");
        fs::write(dir.join("comm"), "bash\n").expect("Failed to write comm");

        let mut poller = Poller::new(root.path(), WatchList::default());
        let entries = collect_proc_entries(root.path());
        assert!(poller.filter_relevant(&entries).unwrap().is_empty());
        assert!(poller.ignore_set().is_empty());
    }
}
