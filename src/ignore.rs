//! Negative cache of processes known not to be watched.
//!
//! Entries are keyed by pid and remember the process start time, so a pid
//! recycled by a new process is not mistaken for the one that was ignored.
//! The set is owned by the poll loop, lives for one run and is never persisted.
//!
//! Checking an entry still costs one `stat` read per cycle, so the cache saves
//! the name lookup and watch-list match, not the file access.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};

/// Processes confirmed not to match the watch list.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    /// pid -> start time in clock ticks since boot
    entries: HashMap<u32, u64>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pid: u32, start_ticks: u64) {
        self.entries.insert(pid, start_ticks);
    }

    /// Whether the pid was ignored earlier, without looking at its start time.
    pub fn contains_pid(&self, pid: u32) -> bool {
        self.entries.contains_key(&pid)
    }

    /// Returns true if this exact process is ignored.
    ///
    /// An entry for the same pid with another start time is dropped, since the
    /// pid now belongs to a different process.
    pub fn check(&mut self, pid: u32, start_ticks: u64) -> bool {
        match self.entries.get(&pid) {
            Some(&known) if known == start_ticks => true,
            Some(_) => {
                self.entries.remove(&pid);
                false
            }
            None => false,
        }
    }

    /// Drops entries whose pid is not in `live`. Returns how many were removed.
    pub fn retain_live(&mut self, live: &HashSet<u32>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|pid, _| live.contains(pid));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
