//! The sampling loop.
//!
//! A single warm-up poll is printed only. After that the CSV file is opened and
//! every cycle is both printed and appended, until the process is killed.

use std::io::{self, Write};
use std::thread;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::poller::Poller;
use crate::report::{print_samples, CsvReporter};
use crate::sampler::SampleError;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("output failed: {0}")]
    Output(#[from] io::Error),
}

/// Polls once and prints the samples. Returns how many were printed.
pub fn warm_up<W: Write>(poller: &mut Poller, out: &mut W) -> Result<usize, RunError> {
    let samples = poller.poll()?;
    print_samples(out, &samples)?;
    out.flush()?;
    Ok(samples.len())
}

/// Polls once, prints the samples followed by a blank line, and appends them to the CSV.
pub fn run_cycle<W: Write, C: Write>(
    poller: &mut Poller,
    csv: &mut CsvReporter<C>,
    out: &mut W,
) -> Result<usize, RunError> {
    let samples = poller.poll()?;
    print_samples(out, &samples)?;
    writeln!(out)?;
    out.flush()?;
    csv.write_samples(&samples)?;
    debug!("{} CSV rows written so far", csv.rows_written());
    Ok(samples.len())
}

/// Runs warm-up and then the endless poll loop.
pub fn run(config: &Config) -> Result<(), RunError> {
    let mut poller = Poller::new(config.proc_root(), config.watch_list());
    let interval = config.interval();

    if poller.watch_list().is_empty() {
        warn!("Watch list is empty, no process will be sampled");
    }

    info!(
        "Watching {} names under {} every {:?}",
        poller.watch_list().len(),
        poller.proc_root().display(),
        interval
    );

    let mut out = io::stdout().lock();
    let found = warm_up(&mut poller, &mut out)?;
    info!("Warm-up poll found {} watched processes", found);

    let (mut csv, path) = CsvReporter::create_in(config.output_dir())?;
    info!("CSV output: {}", path.display());

    loop {
        run_cycle(&mut poller, &mut csv, &mut out)?;
        thread::sleep(interval);
    }
}
