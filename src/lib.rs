//! oom-watch library
//!
//! Samples memory accounting and OOM-killer tunables of every process whose
//! name is on a watch list, and records them to the console and a CSV file.
//!
//! # Usage
//!
//! ```no_run
//! use oom_watch::{report::console_line, Poller, WatchList};
//!
//! let mut poller = Poller::new("/proc", WatchList::new(["python3"]));
//! for sample in poller.poll().expect("poll failed") {
//!     println!("{}", console_line(&sample));
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod ignore;
pub mod poller;
pub mod process;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod startup_checks;
pub mod watch;

// Re-export main types for convenience
pub use config::Config;
pub use ignore::IgnoreSet;
pub use poller::{PollStats, Poller, RelevantProcess};
pub use report::{CsvReporter, CSV_HEADER};
pub use sampler::{Sample, SampleError, SampleOutcome};
pub use watch::{WatchList, DEFAULT_WATCH};
