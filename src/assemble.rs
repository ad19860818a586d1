use std::io::Write;

use log::{debug, trace};

use crate::codec::empty_frame;
use crate::error::{ParzstError, Result};
use crate::worker::WorkResult;

/// Writes completed waves to the sink in chunk order.
pub struct OutputAssembler<W: Write> {
    sink: W,
    level: i32,
    next_index: u64,
    bytes_written: u64,
    frames_written: u64,
    finalized: bool,
}

impl<W: Write> OutputAssembler<W> {
    pub fn new(sink: W, level: i32) -> Self {
        Self {
            sink,
            level,
            next_index: 0,
            bytes_written: 0,
            frames_written: 0,
            finalized: false,
        }
    }

    /// Write one drained wave.
    ///
    /// Results may arrive in any order; they are written by ascending chunk
    /// index. `first_index` is the index of the first chunk read for this
    /// wave, which must continue from the previous wave. Empty chunks are
    /// never dispatched, so a wave may hold fewer results than chunks.
    pub fn write_wave(&mut self, first_index: u64, mut results: Vec<WorkResult>) -> Result<()> {
        if first_index != self.next_index {
            return Err(ParzstError::Internal(format!(
                "wave starts at chunk {first_index}, expected {}",
                self.next_index
            )));
        }
        results.sort_by_key(|r| r.index);
        for result in results {
            if self.finalized {
                return Err(ParzstError::Internal(format!(
                    "chunk {} arrived after the stream was finalized",
                    result.index
                )));
            }
            if result.index < self.next_index {
                return Err(ParzstError::Internal(format!(
                    "chunk {} written out of order (next is {})",
                    result.index, self.next_index
                )));
            }
            trace!(
                "chunk {} (slot {}): {} -> {} bytes",
                result.index,
                result.slot,
                result.input_len,
                result.data.len()
            );
            self.sink.write_all(&result.data)?;
            self.bytes_written += result.data.len() as u64;
            self.frames_written += 1;
            self.next_index = result.index + 1;
            self.finalized = result.finalizes;
        }
        Ok(())
    }

    /// Record chunks that were read but not dispatched, keeping the index
    /// sequence contiguous for the next wave.
    pub fn skip_to(&mut self, next_index: u64) {
        if next_index > self.next_index {
            self.next_index = next_index;
        }
    }

    /// Flush the sink. An input that produced no frames gets one empty frame
    /// so the output is always a decodable stream.
    pub fn finish(mut self) -> Result<(W, u64)> {
        if self.frames_written == 0 {
            debug!("no payload written, emitting empty frame");
            let frame = empty_frame(self.level)
                .map_err(|source| ParzstError::Codec { index: 0, source })?;
            self.sink.write_all(&frame)?;
            self.bytes_written += frame.len() as u64;
            self.frames_written += 1;
        }
        self.sink.flush()?;
        Ok((self.sink, self.bytes_written))
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
