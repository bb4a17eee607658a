use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_FRACTIONAL_DIGITS, DEFAULT_MAX_IN_FLIGHT, ENV_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Tuning knobs for the aggregation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Bytes read per block before extending to the next newline
    #[validate(range(min = 1))]
    pub block_size: usize,

    /// Chunks read from disk but not yet aggregated
    #[validate(range(min = 1))]
    pub max_in_flight: usize,

    #[validate(range(min = 1))]
    pub workers: usize,

    #[validate(range(min = 1, max = 6))]
    pub fractional_digits: u8,
}

impl EngineConfig {
    /// Layer defaults, an optional config file and `BRC_*` environment variables
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("block_size", defaults.block_size as i64)?
            .set_default("max_in_flight", defaults.max_in_flight as i64)?
            .set_default("workers", defaults.workers as i64)?
            .set_default("fractional_digits", i64::from(defaults.fractional_digits))?;

        if let Some(path) = config_file {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let loaded: Self = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Apply command-line overrides on top of the loaded layers
    pub fn with_overrides(
        mut self,
        block_size: Option<usize>,
        max_in_flight: Option<usize>,
        workers: Option<usize>,
    ) -> Result<Self> {
        if let Some(block_size) = block_size {
            self.block_size = block_size;
        }
        if let Some(max_in_flight) = max_in_flight {
            self.max_in_flight = max_in_flight;
        }
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn summary(&self) -> String {
        format!(
            "block size {} bytes, {} chunks in flight, {} workers, {} fractional digit(s)",
            self.block_size, self.max_in_flight, self.workers, self.fractional_digits
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            workers: num_cpus::get(),
            fractional_digits: DEFAULT_FRACTIONAL_DIGITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.block_size, 30 * 1024 * 1024);
        assert_eq!(config.max_in_flight, 1000);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_loads_values_from_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "block_size = 4096")?;
        writeln!(file, "workers = 3")?;

        let config = EngineConfig::load(Some(file.path()))?;

        assert_eq!(config.block_size, 4096);
        assert_eq!(config.workers, 3);
        assert_eq!(config.max_in_flight, DEFAULT_MAX_IN_FLIGHT);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/brc.toml")));
        assert!(matches!(result, Err(ProcessingError::ConfigLoad(_))));
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = EngineConfig::default()
            .with_overrides(Some(64), None, Some(2))
            .unwrap();
        assert_eq!(config.block_size, 64);
        assert_eq!(config.workers, 2);

        let invalid = EngineConfig::default().with_overrides(None, Some(0), None);
        assert!(matches!(invalid, Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_rejects_unsupported_fractional_digits() {
        let config = EngineConfig {
            fractional_digits: 9,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
