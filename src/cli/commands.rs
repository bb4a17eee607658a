use crate::cli::args::{Cli, Commands};
use crate::config::EngineConfig;
use crate::error::{ProcessingError, Result};
use crate::generator::MeasurementGenerator;
use crate::processors::{CancelHandle, ParallelProcessor};
use crate::utils::progress::ProgressReporter;
use crate::writers::{OutputFormat, ResultWriter};
use std::fs::File;
use std::future::Future;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.log_level(), cli.log_file.as_deref())?;
    let silent = cli.quiet;

    match cli.command {
        Commands::Process {
            input,
            output,
            format,
            config,
            workers,
            block_size,
            max_in_flight,
        } => {
            let config = EngineConfig::load(config.as_deref())?.with_overrides(
                block_size,
                max_in_flight,
                workers,
            )?;
            process_command(&input, output, format, config, silent).await
        }

        Commands::Generate {
            output,
            rows,
            seed,
            producers,
        } => {
            let progress = ProgressReporter::new_spinner("Generating measurements...", silent);
            let mut generator = MeasurementGenerator::new(rows)
                .with_producers(producers)
                .with_progress(progress);
            if let Some(seed) = seed {
                generator = generator.with_seed(seed);
            }

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            generator.write_to_path(&output).await?;
            Ok(())
        }
    }
}

async fn process_command(
    input: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: EngineConfig,
    silent: bool,
) -> Result<()> {
    let file_size = std::fs::metadata(input)?.len();
    let progress = ProgressReporter::new_bytes(file_size, "Aggregating measurements...", silent);
    let processor = ParallelProcessor::new(config).with_progress(progress);
    let cancel = processor.cancel_handle();

    let (measurements, report) =
        until_interrupted(processor.process_file(input), tokio::signal::ctrl_c(), &cancel).await?;
    debug!("{:?}", report);

    let writer = ResultWriter::with_format(format);
    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(&path)?);
            writer.write_to(&measurements, &mut out)?;
            info!(
                "Wrote {} stations as {} to {}",
                measurements.len(),
                format,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            writer.write_to(&measurements, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Drive `work` to completion unless `interrupt` fires first.
///
/// A failure to listen for the interrupt is logged and the work carries on.
async fn until_interrupted<T>(
    work: impl Future<Output = Result<T>>,
    interrupt: impl Future<Output = io::Result<()>>,
    cancel: &CancelHandle,
) -> Result<T> {
    tokio::pin!(work);

    let interrupted = tokio::select! {
        result = &mut work => return result,
        signal = interrupt => signal,
    };

    match interrupted {
        Ok(()) => {
            warn!("Received CTRL+C, cancelling");
            cancel.cancel();
            Err(ProcessingError::Cancelled)
        }
        Err(e) => {
            warn!("Unable to listen for CTRL+C: {}", e);
            work.await
        }
    }
}

/// Set up structured logging on stderr, or in a file when one is given
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brc_aggregator={}", log_level)));

    let initialised = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    initialised
        .map_err(|e| ProcessingError::Config(format!("failed to initialise logging: {}", e)))?;
    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future;

    #[tokio::test]
    async fn test_interrupt_cancels_running_work() {
        let cancel = ParallelProcessor::default().cancel_handle();
        let work = future::pending::<Result<u32>>();
        let interrupt = async { Ok::<(), io::Error>(()) };

        let result = until_interrupted(work, interrupt, &cancel).await;

        assert!(matches!(result, Err(ProcessingError::Cancelled)));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_failed_interrupt_listener_lets_work_finish() {
        let cancel = ParallelProcessor::default().cancel_handle();
        let work = async {
            tokio::task::yield_now().await;
            Ok::<_, ProcessingError>(42)
        };
        let interrupt = async { Err::<(), _>(io::Error::new(io::ErrorKind::Other, "no signal")) };

        let result = until_interrupted(work, interrupt, &cancel).await;

        assert_eq!(result.unwrap(), 42);
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_finished_work_is_returned() {
        let cancel = ParallelProcessor::default().cancel_handle();
        let work = async { Ok::<_, ProcessingError>("done") };

        let result = until_interrupted(work, future::pending::<io::Result<()>>(), &cancel).await;

        assert_eq!(result.unwrap(), "done");
        assert!(!cancel.is_cancelled());
    }
}
