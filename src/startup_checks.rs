//! Startup requirement validation for oom-watch.
//!
//! Without root only processes of the same user expose their memory maps, so
//! a non-root run is allowed but warned about.

use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::process::{read_process_name, read_statm, ProcEntry};

/// Validate all runtime requirements
pub fn validate_requirements(proc_root: &Path) -> Result<(), ValidationError> {
    info!("Validating runtime requirements...");

    check_user_privileges();
    check_proc_root(proc_root)?;

    info!("All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("Not running as root - processes of other users cannot be sampled");
        warn!("   Reading their smaps fails with permission denied and stops the sampler");
    } else {
        info!("Running as root (uid=0)");
    }
}

/// Check that the proc root is a readable process filesystem
fn check_proc_root(proc_root: &Path) -> Result<(), ValidationError> {
    if let Err(e) = fs::read_dir(proc_root) {
        return Err(ValidationError::ProcRootUnreadable(format!(
            "{}: {}",
            proc_root.display(),
            e
        )));
    }

    // Our own entry must be present when sampling the live system
    if proc_root == Path::new("/proc") {
        let own = ProcEntry::new(proc_root, std::process::id());
        read_process_name(&own.proc_path)
            .and_then(|_| read_statm(&own.proc_path))
            .map_err(|e| ValidationError::NotAProcFs(e.to_string()))?;
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Cannot read proc root {0}")]
    ProcRootUnreadable(String),

    #[error("Proc root does not expose this process: {0}")]
    NotAProcFs(String),
}
