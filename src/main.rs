//! oom-watch - version 0.1.0
//!
//! Entry point: resolves configuration, sets up logging and either runs a
//! subcommand or the endless sampling loop.

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

use oom_watch::cli::{Args, Commands, LogLevel};
use oom_watch::commands::{command_check, command_test};
use oom_watch::config::{resolve_config, show_config, validate_effective_config};
use oom_watch::{runner, startup_checks};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(level: LogLevel) -> Result<(), Box<dyn std::error::Error>> {
    let max_level = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized with level: {:?}", level);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.check_config {
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if args.show_config {
        return show_config(&config, args.config_format);
    }

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(config.log_level())?;

    if let Some(command) = &args.command {
        return match command {
            Commands::Check => command_check(&config),
            Commands::Test {
                iterations,
                verbose,
            } => command_test(*iterations, *verbose, &config),
        };
    }

    info!("Starting oom-watch");

    if let Err(e) = startup_checks::validate_requirements(config.proc_root()) {
        error!("Startup validation failed: {}", e);
        return Err(e.into());
    }

    if let Err(e) = runner::run(&config) {
        error!("Sampling stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
