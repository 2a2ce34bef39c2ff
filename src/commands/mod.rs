//! CLI command implementations for oom-watch.
//!
//! This module provides implementations for the CLI subcommands:
//! - `check`: System validation
//! - `test`: A bounded number of poll cycles without CSV output

pub mod check;

// Re-export command functions
pub use check::command_check;
pub use test::command_test;
