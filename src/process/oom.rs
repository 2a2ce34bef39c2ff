//! OOM-killer tunables exposed under `/proc/<pid>/`.

use std::fs;
use std::io;
use std::path::Path;

pub const OOM_ADJ: &str = "oom_adj";
pub const OOM_SCORE: &str = "oom_score";
pub const OOM_SCORE_ADJ: &str = "oom_score_adj";

/// The three OOM-control values of one process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OomControl {
    /// Legacy adjustment, -17..=15.
    pub oom_adj: i32,
    /// Kernel-computed kill priority.
    pub oom_score: i32,
    /// User-settable bias, -1000..=1000.
    pub oom_score_adj: i32,
}

/// Parses a single base-10 integer, surrounding whitespace allowed.
pub fn parse_oom_value(content: &str) -> io::Result<i32> {
    let trimmed = content.trim();
    trimmed.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid integer '{}'", trimmed),
        )
    })
}

/// Reads one of [`OOM_ADJ`], [`OOM_SCORE`] or [`OOM_SCORE_ADJ`].
pub fn read_oom_value(proc_path: &Path, file: &str) -> io::Result<i32> {
    let content = fs::read_to_string(proc_path.join(file))?;
    parse_oom_value(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_oom_value() {
        assert_eq!(parse_oom_value("0\n").unwrap(), 0);
        assert_eq!(parse_oom_value("667\n").unwrap(), 667);
        assert_eq!(parse_oom_value("-1000\n").unwrap(), -1000);
        assert_eq!(parse_oom_value("  -17 ").unwrap(), -17);
    }

    #[test]
    fn test_parse_oom_value_malformed() {
        for bad in ["", "\n", "abc", "1.5", "12 34"] {
            let err = parse_oom_value(bad).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData, "input {:?}", bad);
        }
    }

    #[test]
    fn test_read_oom_value_round_trip() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join(OOM_SCORE), "1234\n").expect("Failed to write oom_score");
        fs::write(dir.path().join(OOM_SCORE_ADJ), "-500\n").expect("Failed to write oom_score_adj");

        assert_eq!(read_oom_value(dir.path(), OOM_SCORE).unwrap(), 1234);
        assert_eq!(read_oom_value(dir.path(), OOM_SCORE_ADJ).unwrap(), -500);
        assert_eq!(
            read_oom_value(dir.path(), OOM_ADJ).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
