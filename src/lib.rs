pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use crate::config::EngineConfig;
pub use error::{ProcessingError, Result};
pub use models::{Measurements, StationStats};
pub use processors::{ParallelProcessor, ProcessingReport};
