pub mod chunk;
pub mod statistics;

pub use chunk::Chunk;
pub use statistics::{Measurements, StationMap, StationStats, StationSummary};
