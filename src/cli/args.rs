use crate::utils::constants::DEFAULT_OUTPUT_FILE;
use crate::writers::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brc-aggregator")]
#[command(about = "Chunked parallel min/mean/max aggregation of station temperature files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors and hide progress"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a measurements file and print min/mean/max per station
    Process {
        #[arg(short, long, help = "Input measurements file")]
        input: PathBuf,

        #[arg(short, long, help = "Write results to this file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Lines)]
        format: OutputFormat,

        #[arg(long, help = "Configuration file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,

        #[arg(long, help = "Worker threads [default: number of CPUs]")]
        workers: Option<usize>,

        #[arg(long, help = "Bytes per read block [default: 30MB]")]
        block_size: Option<usize>,

        #[arg(long, help = "Chunks read but not yet aggregated [default: 1000]")]
        max_in_flight: Option<usize>,
    },

    /// Generate a synthetic measurements file
    Generate {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        #[arg(short, long, help = "Number of records to write")]
        rows: u64,

        #[arg(long, help = "Random seed [default: random]")]
        seed: Option<u64>,

        #[arg(long, default_value_t = num_cpus::get())]
        producers: usize,
    },
}
