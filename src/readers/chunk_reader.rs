use crate::error::Result;
use crate::models::Chunk;
use crate::utils::constants::RECORD_TERMINATOR;
use crate::utils::progress::ProgressReporter;
use std::io::{self, BufRead, BufReader, Read};
use tracing::{debug, warn};

const READ_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Splits a byte stream into record-aligned chunks.
///
/// Each chunk is a block of `block_size` bytes extended forward to the next
/// newline, so the following chunk starts on the first byte of a record.
/// Bytes after the final newline of the stream are dropped.
pub struct ChunkReader<R: Read> {
    reader: BufReader<R>,
    block_size: usize,
    offset: u64,
    bytes_read: u64,
    chunks_emitted: usize,
    finished: bool,
    progress: Option<ProgressReporter>,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, block_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, inner),
            block_size: block_size.max(1),
            offset: 0,
            bytes_read: 0,
            chunks_emitted: 0,
            finished: false,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Total bytes pulled from the underlying reader, including dropped tail bytes
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn chunks_emitted(&self) -> usize {
        self.chunks_emitted
    }

    /// Read the next chunk, or `None` once the stream is exhausted
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.finished {
            return Ok(None);
        }

        let mut data = vec![0u8; self.block_size];
        let filled = fill_block(&mut self.reader, &mut data)?;
        data.truncate(filled);

        // A short block means the reader hit end of stream
        let mut at_eof = filled < self.block_size;

        if !at_eof && data.last() != Some(&RECORD_TERMINATOR) {
            let extended = self.reader.read_until(RECORD_TERMINATOR, &mut data)?;
            if extended == 0 || data.last() != Some(&RECORD_TERMINATOR) {
                at_eof = true;
            }
        }

        let raw_len = data.len() as u64;
        self.bytes_read += raw_len;
        if let Some(ref progress) = self.progress {
            progress.increment(raw_len);
        }

        if at_eof {
            self.finished = true;
            let aligned_len = data
                .iter()
                .rposition(|&b| b == RECORD_TERMINATOR)
                .map_or(0, |pos| pos + 1);
            if aligned_len < data.len() {
                warn!(
                    offset = self.offset + aligned_len as u64,
                    dropped = data.len() - aligned_len,
                    "Dropping bytes after the final newline"
                );
                data.truncate(aligned_len);
            }
        }

        if data.is_empty() {
            return Ok(None);
        }

        let chunk = Chunk::aligned(self.offset, data);
        self.offset += chunk.len() as u64;
        self.chunks_emitted += 1;

        debug!(
            offset = chunk.offset(),
            len = chunk.len(),
            index = self.chunks_emitted,
            "Chunk read"
        );

        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(chunk) => chunk.map(Ok),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::fmt::Debug for ChunkReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkReader")
            .field("block_size", &self.block_size)
            .field("offset", &self.offset)
            .field("chunks_emitted", &self.chunks_emitted)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Read until `buf` is full or the reader is exhausted
fn fill_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
