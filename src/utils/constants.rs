/// Record framing bytes
pub const FIELD_SEPARATOR: u8 = b';';
pub const RECORD_TERMINATOR: u8 = b'\n';
pub const DECIMAL_POINT: u8 = b'.';
pub const MINUS_SIGN: u8 = b'-';

/// Processing defaults
pub const DEFAULT_BLOCK_SIZE: usize = 30 * 1024 * 1024; // 30MB
pub const DEFAULT_MAX_IN_FLIGHT: usize = 1000;
pub const DEFAULT_FRACTIONAL_DIGITS: u8 = 1;
pub const MAX_FRACTIONAL_DIGITS: u8 = 6;

/// Presized map capacities: one chunk sees a subset of the stations the
/// final result holds
pub const STATION_MAP_CAPACITY: usize = 512;
pub const FINAL_MAP_CAPACITY: usize = 5000;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BRC";

/// Output formats
pub const FORMAT_LINES: &str = "lines";
pub const FORMAT_BRACES: &str = "braces";
pub const FORMAT_JSON: &str = "json";

/// Generator defaults
pub const DEFAULT_OUTPUT_FILE: &str = "measurements.txt";
pub const GENERATOR_BATCH_ROWS: usize = 4096;
pub const GENERATOR_CHANNEL_CAPACITY: usize = 64;
pub const GENERATOR_STD_DEV: f64 = 10.0;
