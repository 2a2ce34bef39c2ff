//! Configuration management for oom-watch.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats. With no file and
//! no flags the defaults reproduce the built-in behavior.

use crate::cli::{Args, ConfigFormat, LogLevel};
use crate::watch::{WatchList, DEFAULT_WATCH};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;

/// Config file locations tried when `--config` is not given.
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "/etc/oom-watch/oom-watch.yaml",
    "/etc/oom-watch/oom-watch.yml",
    "/etc/oom-watch/oom-watch.json",
    "/etc/oom-watch/oom-watch.toml",
    "./oom-watch.yaml",
    "./oom-watch.yml",
    "./oom-watch.json",
    "./oom-watch.toml",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Exact process names to sample
    #[serde(alias = "watch-names", alias = "watch")]
    pub watch_names: Option<Vec<String>>,

    /// Seconds between poll cycles
    #[serde(alias = "interval-secs")]
    pub interval_secs: Option<u64>,

    /// Directory where the CSV file is created
    #[serde(alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Root of the process filesystem
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_names: Some(DEFAULT_WATCH.iter().map(|s| s.to_string()).collect()),
            interval_secs: Some(DEFAULT_INTERVAL_SECS),
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    pub fn watch_list(&self) -> WatchList {
        match &self.watch_names {
            Some(names) => WatchList::new(names.iter().cloned()),
            None => WatchList::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS))
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR))
    }

    pub fn proc_root(&self) -> &Path {
        self.proc_root
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_PROC_ROOT))
    }

    /// Parsed log level; invalid strings are rejected by validation.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|s| LogLevel::from_str(s, true).ok())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(names) = &cfg.watch_names {
        if names.is_empty() {
            return Err("watch_names must contain at least one process name".into());
        }
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err("watch_names must not contain empty names".into());
        }
    }

    if cfg.interval_secs == Some(0) {
        return Err("interval_secs must be at least 1".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            )
            .into());
        }
    }

    if let Some(dir) = &cfg.output_dir {
        if !dir.is_dir() {
            return Err(format!("output_dir is not a directory: {}", dir.display()).into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(watch_str) = &args.watch {
        config.watch_names = Some(
            watch_str
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        );
    }

    if let Some(secs) = args.interval_secs {
        config.interval_secs = Some(secs);
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(level) = args.log_level {
        if let Some(pv) = level.to_possible_value() {
            config.log_level = Some(pv.get_name().to_string());
        }
    }

    Ok(config)
}

/// Loads a config file, or the first default location that exists.
/// Returns the defaults when no file is found.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config text, choosing the format from the file extension (YAML by default).
///
/// Fields missing from the file keep their default values.
pub fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let parsed: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(merge_defaults(parsed))
}

fn merge_defaults(parsed: Config) -> Config {
    let defaults = Config::default();
    Config {
        watch_names: parsed.watch_names.or(defaults.watch_names),
        interval_secs: parsed.interval_secs.or(defaults.interval_secs),
        output_dir: parsed.output_dir.or(defaults.output_dir),
        proc_root: parsed.proc_root.or(defaults.proc_root),
        log_level: parsed.log_level.or(defaults.log_level),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    println!("{output}");
    Ok(())
}
