use crate::error::{ProcessingError, Result};
use crate::utils::constants::RECORD_TERMINATOR;

/// A record-aligned slice of the input file, owned by exactly one worker.
///
/// The data always starts at a record boundary and, unless empty, ends with a
/// newline. `offset` is the position of the first byte in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    offset: u64,
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(offset: u64, data: Vec<u8>) -> Result<Self> {
        match data.last() {
            None | Some(&RECORD_TERMINATOR) => Ok(Self { offset, data }),
            Some(_) => {
                let tail = data
                    .iter()
                    .rposition(|&b| b == RECORD_TERMINATOR)
                    .map_or(0, |pos| pos + 1);
                Err(ProcessingError::malformed(
                    offset + tail as u64,
                    "chunk does not end with a newline",
                ))
            }
        }
    }

    /// Splitter-side constructor; the caller has already aligned the data
    pub(crate) fn aligned(offset: u64, data: Vec<u8>) -> Self {
        debug_assert!(data.last().map_or(true, |&b| b == RECORD_TERMINATOR));
        Self { offset, data }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl TryFrom<&str> for Chunk {
    type Error = ProcessingError;

    fn try_from(text: &str) -> Result<Self> {
        Self::new(0, text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_newline_terminated_data() {
        let chunk = Chunk::try_from("A;1.0\nB;2.0\n").unwrap();
        assert_eq!(chunk.len(), 12);
        assert_eq!(chunk.offset(), 0);
    }

    #[test]
    fn test_accepts_empty_data() {
        let chunk = Chunk::new(42, Vec::new()).unwrap();
        assert!(chunk.is_empty());
        assert_eq!(chunk.offset(), 42);
    }

    #[test]
    fn test_rejects_partial_trailing_record() {
        let err = Chunk::new(100, b"A;1.0\nB;2".to_vec()).unwrap_err();
        match err {
            ProcessingError::MalformedRecord { offset, .. } => assert_eq!(offset, 106),
            other => panic!("unexpected error: {other}"),
        }
    }
}
