//! Console and CSV output for samples.

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::sampler::Sample;

/// Header line of every CSV file, written once per run.
pub const CSV_HEADER: &str = "name,pid,oom_adj,oom_score,oom_score_adj,vms\n";

/// Fixed-width console line: name (20, left), pid (8, right), oom_score (5, right).
pub fn console_line(sample: &Sample) -> String {
    format!(
        "{:<20} {:>8} {:>5}",
        sample.name, sample.pid, sample.oom.oom_score
    )
}

/// Writes one console line per sample.
pub fn print_samples<W: Write>(out: &mut W, samples: &[Sample]) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{}", console_line(sample))?;
    }
    Ok(())
}

/// One CSV row, including the trailing newline.
pub fn csv_row(sample: &Sample) -> String {
    format!(
        "{},{},{},{},{},{}\n",
        csv_field(&sample.name),
        sample.pid,
        sample.oom.oom_adj,
        sample.oom.oom_score,
        sample.oom.oom_score_adj,
        sample.memory.vms
    )
}

/// Quotes a field only when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// File name for a run started at `now`, e.g. `2026-10-16 09:14:03.512093.csv`.
pub fn csv_file_name(now: DateTime<Local>) -> String {
    format!("{}.csv", now.format("%Y-%m-%d %H:%M:%S%.6f"))
}

/// Appends sample rows to a CSV sink, flushing after every batch.
pub struct CsvReporter<W: Write> {
    writer: W,
    rows_written: u64,
}

impl<W: Write> CsvReporter<W> {
    /// Wraps `writer` and writes the header.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writer.write_all(CSV_HEADER.as_bytes())?;
        writer.flush()?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Appends one row per sample, then flushes.
    pub fn write_samples(&mut self, samples: &[Sample]) -> io::Result<()> {
        for sample in samples {
            self.writer.write_all(csv_row(sample).as_bytes())?;
            self.rows_written += 1;
        }
        self.writer.flush()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvReporter<BufWriter<File>> {
    /// Creates a timestamp-named CSV file in `dir`.
    pub fn create_in(dir: &Path) -> io::Result<(Self, PathBuf)> {
        let path = dir.join(csv_file_name(Local::now()));
        let file = File::create(&path)?;
        info!("Writing samples to {}", path.display());
        Ok((Self::new(BufWriter::new(file))?, path))
    }
}
