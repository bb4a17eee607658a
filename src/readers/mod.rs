pub mod chunk_reader;
pub mod temperature_decoder;

pub use chunk_reader::ChunkReader;
pub use temperature_decoder::{DecodeError, TemperatureDecoder};
