use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, StationMap, StationStats};
use crate::readers::TemperatureDecoder;
use crate::utils::constants::{FIELD_SEPARATOR, RECORD_TERMINATOR, STATION_MAP_CAPACITY};

/// Folds the records of one chunk into a local station map.
///
/// Station names are looked up as borrowed slices of the chunk; an owned key
/// is only allocated the first time a station appears in the chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkAggregator {
    decoder: TemperatureDecoder,
}

impl ChunkAggregator {
    pub fn new(decoder: TemperatureDecoder) -> Self {
        Self { decoder }
    }

    /// Scan the chunk once, left to right, and return its partial statistics
    pub fn aggregate(&self, chunk: &Chunk) -> Result<StationMap> {
        let bytes = chunk.as_bytes();
        let base = chunk.offset();
        let mut stations = StationMap::with_capacity(STATION_MAP_CAPACITY);

        let mut record_start = 0usize;
        let mut separator: Option<usize> = None;

        for (index, &byte) in bytes.iter().enumerate() {
            match byte {
                FIELD_SEPARATOR => {
                    if separator.is_some() {
                        return Err(ProcessingError::malformed(
                            base + index as u64,
                            "unexpected second ';' in record",
                        ));
                    }
                    separator = Some(index);
                }
                RECORD_TERMINATOR => {
                    let record_offset = base + record_start as u64;
                    let name_end = separator.take().ok_or_else(|| {
                        ProcessingError::malformed(record_offset, "missing ';' separator")
                    })?;

                    let value_bytes = &bytes[name_end + 1..index];
                    let value = self.decoder.decode(value_bytes).map_err(|e| {
                        ProcessingError::malformed(
                            base + name_end as u64 + 1,
                            format!(
                                "invalid temperature '{}': {}",
                                String::from_utf8_lossy(value_bytes),
                                e
                            ),
                        )
                    })?;

                    let name = station_name(&bytes[record_start..name_end], record_offset)?;
                    match stations.get_mut(name) {
                        Some(stats) => stats.observe(value),
                        None => {
                            stations.insert(name.to_owned(), StationStats::new(value));
                        }
                    }

                    record_start = index + 1;
                }
                _ => {}
            }
        }

        if record_start != bytes.len() {
            return Err(ProcessingError::malformed(
                base + record_start as u64,
                "record is not terminated by a newline",
            ));
        }

        Ok(stations)
    }
}

fn station_name(bytes: &[u8], offset: u64) -> Result<&str> {
    if bytes.is_empty() {
        return Err(ProcessingError::malformed(offset, "empty station name"));
    }
    std::str::from_utf8(bytes)
        .map_err(|_| ProcessingError::malformed(offset, "station name is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(text: &str) -> Result<StationMap> {
        ChunkAggregator::default().aggregate(&Chunk::try_from(text)?)
    }

    fn malformed_offset(err: ProcessingError) -> u64 {
        match err {
            ProcessingError::MalformedRecord { offset, .. } => offset,
            other => panic!("expected malformed record, got {other}"),
        }
    }

    #[test]
    fn test_aggregates_repeated_stations() {
        let stations = aggregate("A;1.0\nB;2.0\nA;3.0\n").unwrap();

        assert_eq!(stations.len(), 2);
        let a = stations["A"];
        assert_eq!((a.min, a.max, a.count), (1.0, 3.0, 2));
        assert_eq!(a.mean(), 2.0);
        let b = stations["B"];
        assert_eq!((b.min, b.max, b.count), (2.0, 2.0, 1));
    }

    #[test]
    fn test_handles_multibyte_names_and_negatives() {
        let stations = aggregate("São Paulo;-3.5\nSão Paulo;12.1\nİzmir;0.0\n").unwrap();

        let sao = stations["São Paulo"];
        assert_eq!(sao.min, -3.5);
        assert_eq!(sao.max, 12.1);
        assert_eq!(stations["İzmir"].count, 1);
    }

    #[test]
    fn test_chunk_map_is_smaller_than_final_map() {
        let stations = aggregate("A;1.0\n").unwrap();
        assert!(stations.capacity() >= STATION_MAP_CAPACITY);
        assert!(stations.capacity() < crate::utils::constants::FINAL_MAP_CAPACITY);
    }

    #[test]
    fn test_empty_chunk_gives_empty_map() {
        assert!(aggregate("").unwrap().is_empty());
    }

    #[test]
    fn test_single_observation_has_equal_extremes() {
        let stats = aggregate("Oslo;-7.3\n").unwrap()["Oslo"];
        assert_eq!(stats.min, -7.3);
        assert_eq!(stats.max, -7.3);
        assert_eq!(stats.mean(), -7.3);
    }

    #[test]
    fn test_rejects_missing_separator() {
        let err = aggregate("A;1.0\nB 2.0\n").unwrap_err();
        assert_eq!(malformed_offset(err), 6);
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let err = aggregate("A;1.0\nB;warm\n").unwrap_err();
        assert_eq!(malformed_offset(err), 8);
    }

    #[test]
    fn test_rejects_second_separator() {
        let err = aggregate("A;B;1.0\n").unwrap_err();
        assert_eq!(malformed_offset(err), 3);
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(aggregate(";1.0\n").unwrap_err().is_data_error());
    }

    #[test]
    fn test_rejects_invalid_utf8_name() {
        let chunk = Chunk::new(0, b"\xff\xfe;1.0\n".to_vec()).unwrap();
        let err = ChunkAggregator::default().aggregate(&chunk).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_error_offsets_are_absolute() {
        let chunk = Chunk::new(1_000, b"A;1.0\nB;x.0\n".to_vec()).unwrap();
        let err = ChunkAggregator::default().aggregate(&chunk).unwrap_err();
        assert_eq!(malformed_offset(err), 1_008);
    }
}
