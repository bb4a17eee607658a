use crate::config::EngineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, Measurements, StationMap};
use crate::processors::{ChunkAggregator, MergeReducer};
use crate::readers::{ChunkReader, TemperatureDecoder};
use crate::utils::progress::ProgressReporter;
use crossbeam::channel;
use rayon::prelude::*;
use std::any::Any;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use validator::Validate;

/// Fan-out/fan-in pipeline over one input stream.
///
/// A splitter thread reads record-aligned chunks into a bounded channel, a
/// rayon pool aggregates each chunk into a partial map, and the calling
/// thread merges partials as they arrive. The bounded channel caps how far
/// reading can run ahead of aggregation.
#[derive(Clone)]
pub struct ParallelProcessor {
    config: EngineConfig,
    cancelled: Arc<AtomicBool>,
    progress: ProgressReporter,
}

/// Shared flag that stops a running pipeline from another task
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Statistics about a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingReport {
    pub file_size: Option<u64>,
    pub bytes_read: u64,
    pub chunks: usize,
    pub records: u64,
    pub stations: usize,
    pub elapsed: Duration,
}

impl ProcessingReport {
    pub fn summary(&self) -> String {
        let seconds = self.elapsed.as_secs_f64();
        let throughput = if seconds > 0.0 {
            self.records as f64 / seconds
        } else {
            0.0
        };
        format!(
            "Processed {} records for {} stations from {} bytes in {} chunks in {:.3}s ({:.0} records/s)",
            self.records, self.stations, self.bytes_read, self.chunks, seconds, throughput
        )
    }
}

/// Stop conditions shared by every stage of one run
struct StopSignal<'a> {
    failed: AtomicBool,
    cancelled: &'a AtomicBool,
}

impl StopSignal<'_> {
    fn raise(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    fn is_raised(&self) -> bool {
        self.failed.load(Ordering::Relaxed) || self.cancelled.load(Ordering::Relaxed)
    }
}

impl ParallelProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
            progress: ProgressReporter::hidden(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.config.max_in_flight = max_in_flight;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    /// Aggregate a measurements file on the blocking thread pool
    pub async fn process_file(&self, path: &Path) -> Result<(Measurements, ProcessingReport)> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        info!(
            "Processing {} ({} bytes) with {}",
            path.display(),
            file_size,
            self.config.summary()
        );

        let processor = self.clone();
        tokio::task::spawn_blocking(move || processor.run(file, Some(file_size))).await?
    }

    /// Aggregate any byte stream on the current thread, blocking until done
    pub fn process_reader<R: Read + Send>(
        &self,
        reader: R,
    ) -> Result<(Measurements, ProcessingReport)> {
        self.run(reader, None)
    }

    fn run<R: Read + Send>(
        &self,
        reader: R,
        file_size: Option<u64>,
    ) -> Result<(Measurements, ProcessingReport)> {
        self.config.validate()?;
        let started = Instant::now();

        let aggregator = ChunkAggregator::new(TemperatureDecoder::new(
            self.config.fractional_digits,
        )?);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|index| format!("brc-worker-{}", index))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let (chunk_tx, chunk_rx) = channel::bounded::<Chunk>(self.config.max_in_flight);
        let (partial_tx, partial_rx) = channel::unbounded::<Result<StationMap>>();
        let signal = StopSignal {
            failed: AtomicBool::new(false),
            cancelled: &self.cancelled,
        };
        let signal = &signal;
        let aggregator = &aggregator;
        let block_size = self.config.block_size;
        let progress = self.progress.clone();

        let (reduced, split) = thread::scope(|scope| {
            let splitter = thread::Builder::new()
                .name("brc-splitter".to_string())
                .spawn_scoped(scope, move || {
                    let mut chunks = ChunkReader::new(reader, block_size).with_progress(progress);
                    let outcome = split_into(&mut chunks, &chunk_tx, signal);
                    if outcome.is_err() {
                        signal.raise();
                    }
                    outcome.map(|()| (chunks.bytes_read(), chunks.chunks_emitted()))
                });

            let workers = scope.spawn(move || {
                pool.install(|| {
                    chunk_rx
                        .into_iter()
                        .par_bridge()
                        .for_each_with(partial_tx, |partials, chunk| {
                            if signal.is_raised() {
                                return;
                            }
                            let partial = aggregator.aggregate(&chunk);
                            drop(chunk);
                            // The reducer only hangs up after a failure
                            let _ = partials.send(partial);
                        })
                })
            });

            let partials = partial_rx.iter().take_while(|_| !self.is_cancelled());
            let reduced = MergeReducer::new().reduce(partials);
            if reduced.is_err() {
                signal.raise();
            }
            drop(partial_rx);

            let split = match splitter {
                Ok(handle) => handle.join().map_err(panic_error),
                Err(e) => Err(ProcessingError::Io(e)),
            };
            let joined_workers = workers.join().map_err(panic_error);
            let split = joined_workers.and_then(|()| split);

            (reduced, split)
        });

        let measurements = match reduced {
            Ok(measurements) => measurements,
            Err(e) => {
                error!("Aborting run: {}", e);
                self.progress.abandon();
                return Err(e);
            }
        };
        let (bytes_read, chunks) = match split.and_then(|outcome| outcome) {
            Ok(counts) => counts,
            Err(e) => {
                error!("Aborting run: {}", e);
                self.progress.abandon();
                return Err(e);
            }
        };
        if self.is_cancelled() {
            self.progress.abandon();
            return Err(ProcessingError::Cancelled);
        }

        let report = ProcessingReport {
            file_size,
            bytes_read,
            chunks,
            records: measurements.total_records(),
            stations: measurements.len(),
            elapsed: started.elapsed(),
        };
        self.progress.finish_with_message(&report.summary());
        info!("{}", report.summary());

        Ok((measurements, report))
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Feed chunks to the workers until the stream ends or the run is stopped
fn split_into<R: Read>(
    chunks: &mut ChunkReader<R>,
    chunk_tx: &channel::Sender<Chunk>,
    signal: &StopSignal<'_>,
) -> Result<()> {
    while !signal.is_raised() {
        let Some(chunk) = chunks.next_chunk()? else {
            break;
        };
        if chunk_tx.send(chunk).is_err() {
            break;
        }
    }
    Ok(())
}

fn panic_error(payload: Box<dyn Any + Send>) -> ProcessingError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ProcessingError::WorkerPanic(message)
}
