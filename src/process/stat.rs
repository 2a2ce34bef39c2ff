//! Process start time from `/proc/<pid>/stat`.
//!
//! The start time disambiguates a recycled pid from the process that held it
//! before.

use std::fs;
use std::io;
use std::path::Path;

/// Extracts field 22 (starttime, clock ticks since boot) from a stat line.
///
/// Fields are counted after the last `)` so a comm containing spaces or
/// parentheses does not shift them. The comm itself may hold any bytes, so
/// only the part after it has to be valid UTF-8.
pub fn parse_start_ticks(content: &[u8]) -> io::Result<u64> {
    let close = content
        .iter()
        .rposition(|&b| b == b')')
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "stat has no comm field"))?;
    let rest = std::str::from_utf8(&content[close + 1..])
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "stat fields are not UTF-8"))?;

    // rest starts at field 3 (state); starttime is field 22
    let raw = rest
        .split_whitespace()
        .nth(19)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "stat is too short"))?;

    raw.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid starttime '{}'", raw),
        )
    })
}

/// Reads the start time of the process at `proc_path`.
pub fn read_start_ticks(proc_path: &Path) -> io::Result<u64> {
    let content = fs::read(proc_path.join("stat"))?;
    parse_start_ticks(&content)
}
