//! Memory accounting for a single process.
//!
//! Page-granular counters come from `/proc/<pid>/statm`; PSS, USS and swap are
//! summed from `/proc/<pid>/smaps_rollup`, or the full `smaps` on kernels
//! older than 4.14.

use once_cell::sync::Lazy;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Get system page size in bytes (usually 4096).
fn get_page_size() -> u64 {
    // SAFETY: sysconf is safe to call with _SC_PAGESIZE
    // Returns -1 on error, handled by the > 0 check
    unsafe {
        let size = libc::sysconf(libc::_SC_PAGESIZE);
        if size > 0 {
            return size as u64;
        }
    }
    4096
}

/// System page size, used to convert statm pages to bytes.
pub static PAGE_SIZE: Lazy<u64> = Lazy::new(get_page_size);

/// Full memory snapshot of a process, all values in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub rss: u64,
    pub vms: u64,
    pub shared: u64,
    pub text: u64,
    pub lib: u64,
    pub data: u64,
    pub dirty: u64,
    pub uss: u64,
    pub pss: u64,
    pub swap: u64,
}

impl MemoryInfo {
    /// Combines statm counters (in pages) with smaps totals (in bytes).
    pub fn from_parts(statm: &Statm, smaps: &SmapsTotals, page_size: u64) -> Self {
        Self {
            rss: statm.resident * page_size,
            vms: statm.size * page_size,
            shared: statm.shared * page_size,
            text: statm.text * page_size,
            lib: statm.lib * page_size,
            data: statm.data * page_size,
            dirty: statm.dirty * page_size,
            uss: smaps.uss,
            pss: smaps.pss,
            swap: smaps.swap,
        }
    }
}

/// Raw `/proc/<pid>/statm` counters, in pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statm {
    pub size: u64,
    pub resident: u64,
    pub shared: u64,
    pub text: u64,
    pub lib: u64,
    pub data: u64,
    pub dirty: u64,
}

/// Totals summed over all mappings, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmapsTotals {
    pub pss: u64,
    pub uss: u64,
    pub swap: u64,
}

/// Parses the seven space-separated page counters of a statm file.
pub fn parse_statm(content: &str) -> io::Result<Statm> {
    let mut fields = [0u64; 7];
    let mut it = content.split_whitespace();
    for (i, slot) in fields.iter_mut().enumerate() {
        let raw = it.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("statm has {} fields, expected 7", i),
            )
        })?;
        *slot = raw.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid statm field '{}'", raw),
            )
        })?;
    }

    Ok(Statm {
        size: fields[0],
        resident: fields[1],
        shared: fields[2],
        text: fields[3],
        lib: fields[4],
        data: fields[5],
        dirty: fields[6],
    })
}

/// Reads `/proc/<pid>/statm`.
pub fn read_statm(proc_path: &Path) -> io::Result<Statm> {
    let content = fs::read_to_string(proc_path.join("statm"))?;
    parse_statm(&content)
}

/// Sums Pss, Private_Clean + Private_Dirty and Swap lines of smaps-format input.
pub fn parse_smaps_totals<R: BufRead>(reader: R) -> io::Result<SmapsTotals> {
    let mut pss_kb = 0;
    let mut private_clean_kb = 0;
    let mut private_dirty_kb = 0;
    let mut swap_kb = 0;

    for line in reader.lines() {
        let l = line?;
        if let Some(v) = l.strip_prefix("Pss:") {
            pss_kb += parse_kb_value(v).unwrap_or(0);
        } else if let Some(v) = l.strip_prefix("Private_Clean:") {
            private_clean_kb += parse_kb_value(v).unwrap_or(0);
        } else if let Some(v) = l.strip_prefix("Private_Dirty:") {
            private_dirty_kb += parse_kb_value(v).unwrap_or(0);
        } else if let Some(v) = l.strip_prefix("Swap:") {
            swap_kb += parse_kb_value(v).unwrap_or(0);
        }
    }

    Ok(SmapsTotals {
        pss: pss_kb * 1024,
        uss: (private_clean_kb + private_dirty_kb) * 1024,
        swap: swap_kb * 1024,
    })
}

/// Uses smaps_rollup when available, otherwise falls back to full smaps.
pub fn read_smaps_totals(proc_path: &Path) -> io::Result<SmapsTotals> {
    let rollup = proc_path.join("smaps_rollup");
    let path = if rollup.exists() {
        rollup
    } else {
        proc_path.join("smaps")
    };
    let file = fs::File::open(path)?;
    parse_smaps_totals(BufReader::new(file))
}

/// Parses kilobyte values from smaps file lines.
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
