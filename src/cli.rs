//! CLI arguments and subcommands for oom-watch.
//!
//! Every flag is optional; running without arguments samples the built-in
//! watch list once per second.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "oom-watch",
    about = "Samples memory and OOM scores of watched processes into CSV",
    long_about = "Samples memory and OOM scores of watched processes into CSV.\n\n\
                  Polls the process table, prints name, pid and oom_score of every \
                  process on the watch list, and appends oom_adj, oom_score, \
                  oom_score_adj and virtual memory size to a timestamp-named CSV file.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level, logs go to stderr [default: warn]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Process names to watch (comma-separated, exact match)
    #[arg(short = 'w', long)]
    pub watch: Option<String>,

    /// Seconds between poll cycles
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Directory for the CSV file
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Alternative proc root
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate configuration and system requirements
    Check,

    /// Run a few poll cycles and print the samples without writing CSV
    Test {
        /// Number of poll cycles
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Show the full memory breakdown of every sample
        #[arg(long)]
        verbose: bool,
    },
}
