//! Synthetic measurement files for benchmarking and testing the engine.
//!
//! Producers run on the blocking pool, each with its own seeded RNG, and hand
//! formatted batches to a single writer task over a bounded channel. The
//! writer is the only owner of the output file.

pub mod stations;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    GENERATOR_BATCH_ROWS, GENERATOR_CHANNEL_CAPACITY, GENERATOR_STD_DEV,
};
use crate::utils::progress::ProgressReporter;
use crate::utils::round_to_tenths;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub use stations::STATIONS;

const WRITE_BUFFER_SIZE: usize = 1024 * 1024;
const TEMPERATURE_LIMIT: f64 = 99.9;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub rows: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} measurements ({} bytes) in {:.3}s",
            self.rows,
            self.bytes,
            self.elapsed.as_secs_f64()
        )
    }
}

pub struct MeasurementGenerator {
    rows: u64,
    producers: usize,
    seed: u64,
    progress: ProgressReporter,
}

impl MeasurementGenerator {
    pub fn new(rows: u64) -> Self {
        Self {
            rows,
            producers: num_cpus::get(),
            seed: rand::random(),
            progress: ProgressReporter::hidden(),
        }
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Write `rows` records to `path`, replacing any existing file
    pub async fn write_to_path(&self, path: &Path) -> Result<GenerationReport> {
        let started = Instant::now();
        info!(
            "Generating {} measurements into {} with {} producers (seed {})",
            self.rows,
            path.display(),
            self.producers,
            self.seed
        );

        let file = tokio::fs::File::create(path).await?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let (batch_tx, mut batch_rx) = mpsc::channel::<Vec<u8>>(GENERATOR_CHANNEL_CAPACITY);

        let mut producers = JoinSet::new();
        for (index, rows) in split_rows(self.rows, self.producers).enumerate() {
            let batch_tx = batch_tx.clone();
            let seed = self.seed.wrapping_add(index as u64);
            producers.spawn_blocking(move || produce(rows, seed, batch_tx));
        }
        drop(batch_tx);

        let mut bytes = 0u64;
        let mut rows = 0u64;
        while let Some(batch) = batch_rx.recv().await {
            writer.write_all(&batch).await?;
            bytes += batch.len() as u64;
            rows += count_records(&batch);
            self.progress.set_message(&format!("Wrote {} measurements", rows));
        }
        writer.flush().await?;

        while let Some(joined) = producers.join_next().await {
            joined??;
        }

        let report = GenerationReport {
            rows,
            bytes,
            elapsed: started.elapsed(),
        };
        self.progress.finish_with_message(&report.summary());
        info!("{}", report.summary());
        Ok(report)
    }
}

/// Spread `rows` over `producers` so the shares differ by at most one
fn split_rows(rows: u64, producers: usize) -> impl Iterator<Item = u64> {
    let producers = producers.max(1) as u64;
    let base = rows / producers;
    let extra = rows % producers;
    (0..producers)
        .map(move |index| base + u64::from(index < extra))
        .filter(|&share| share > 0)
}

fn produce(rows: u64, seed: u64, batch_tx: mpsc::Sender<Vec<u8>>) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distributions = STATIONS
        .iter()
        .map(|&(_, mean)| Normal::new(mean, GENERATOR_STD_DEV))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ProcessingError::Config(format!("invalid temperature distribution: {}", e)))?;

    let mut remaining = rows;
    while remaining > 0 {
        let batch_rows = remaining.min(GENERATOR_BATCH_ROWS as u64);
        let mut batch = Vec::with_capacity(batch_rows as usize * 24);
        for _ in 0..batch_rows {
            let index = rng.gen_range(0..STATIONS.len());
            let temperature = round_to_tenths(
                distributions[index]
                    .sample(&mut rng)
                    .clamp(-TEMPERATURE_LIMIT, TEMPERATURE_LIMIT),
            );
            writeln!(batch, "{};{:.1}", STATIONS[index].0, temperature)?;
        }

        if batch_tx.blocking_send(batch).is_err() {
            debug!("Writer closed, producer stopping early");
            return Ok(());
        }
        remaining -= batch_rows;
    }
    Ok(())
}

fn count_records(batch: &[u8]) -> u64 {
    batch.iter().filter(|&&b| b == b'\n').count() as u64
}
