//! Readers for the per-process files under a proc root.
//!
//! This module provides:
//! - `scanner`: process discovery and name resolution
//! - `memory`: memory accounting from statm and smaps
//! - `oom`: OOM-killer tunables
//! - `stat`: process start time

pub mod memory;
pub mod oom;
pub mod scanner;
pub mod stat;

// Re-export commonly used types
pub use memory::{read_smaps_totals, read_statm, MemoryInfo, SmapsTotals, Statm, PAGE_SIZE};
pub use oom::{read_oom_value, OomControl, OOM_ADJ, OOM_SCORE, OOM_SCORE_ADJ};
pub use scanner::{collect_proc_entries, read_process_name, ProcEntry};
pub use stat::read_start_ticks;
