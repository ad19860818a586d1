use log::trace;

use crate::chunk::Chunk;
use crate::codec::compress_frame;
use crate::error::{ParzstError, Result};

/// A chunk bound to its compression parameters and worker slot.
///
/// Built by the dispatcher and moved into the worker thread; nothing else
/// holds a reference to it while the worker runs.
#[derive(Debug)]
pub struct WorkItem {
    pub slot: usize,
    pub chunk: Chunk,
    pub level: i32,
}

/// Compressed output for one chunk, handed back through the thread join.
#[derive(Debug)]
pub struct WorkResult {
    pub index: u64,
    pub slot: usize,
    pub input_len: usize,
    pub data: Vec<u8>,
    /// Set only for the final chunk of the stream.
    pub finalizes: bool,
}

impl WorkItem {
    pub fn new(slot: usize, chunk: Chunk, level: i32) -> Self {
        Self { slot, chunk, level }
    }
}

/// Compress one work item to completion.
pub fn run(item: WorkItem) -> Result<WorkResult> {
    let WorkItem { slot, chunk, level } = item;
    let index = chunk.index;
    trace!(
        "slot {slot}: compressing chunk {index} ({} bytes, final={})",
        chunk.len(),
        chunk.is_final
    );
    let data = compress_frame(&chunk.data, level)
        .map_err(|source| ParzstError::Codec { index, source })?;
    trace!("slot {slot}: chunk {index} -> {} bytes", data.len());
    Ok(WorkResult {
        index,
        slot,
        input_len: chunk.data.len(),
        data,
        finalizes: chunk.is_final,
    })
}
