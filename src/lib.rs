//! Chunked parallel zstd compression.
//!
//! The input is split into fixed-size chunks. Chunks are compressed in waves
//! of at most `workers` threads, each with its own codec context, and every
//! wave is written in input order before the next one starts. The output is
//! a sequence of standard zstd frames that the stock decoder reads back as
//! the original byte stream.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::info;

pub mod assemble;
pub mod chunk;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod io_utils;
pub mod stats;
pub mod worker;

pub use assemble::OutputAssembler;
pub use chunk::{read_block, Chunk, ChunkReader};
pub use codec::{compress_frame, compressed_bound, CodecError};
pub use config::{Config, CHUNK_SIZE, DEFAULT_LEVEL, DEFAULT_WORKERS};
pub use dispatch::{Dispatcher, WaveState};
pub use error::{ParzstError, Result};
pub use io_utils::output_path;
pub use stats::CompressionStats;
pub use worker::{WorkItem, WorkResult};

/// Compress everything `source` yields into `sink`.
///
/// Returns the sink after it has been flushed, together with run counters.
pub fn compress_stream<R: Read, W: Write>(
    source: R,
    sink: W,
    config: &Config,
) -> Result<(W, CompressionStats)> {
    Dispatcher::new(source, sink, config)?.run()
}

/// Compress `input` into `input.zst` and return the output path.
///
/// `progress` is sized to the input length and advanced as chunks are read;
/// pass `ProgressBar::hidden()` for none.
pub fn compress_file(
    input: &Path,
    config: &Config,
    progress: ProgressBar,
) -> Result<(PathBuf, CompressionStats)> {
    config.validate()?;
    let out_path = output_path(input);
    info!(
        "Starting compression of {} with level {}, using {} threads",
        input.display(),
        config.level,
        config.workers
    );
    let source = File::open(input).map_err(|source| ParzstError::File {
        operation: "opening input file",
        path: input.to_path_buf(),
        source,
    })?;
    if let Ok(meta) = source.metadata() {
        progress.set_length(meta.len());
    }
    let sink = File::create(&out_path).map_err(|source| ParzstError::File {
        operation: "creating output file",
        path: out_path.clone(),
        source,
    })?;
    let (_, stats) = Dispatcher::new(source, BufWriter::new(sink), config)?
        .with_progress(progress)
        .run()?;
    info!("Wrote {}", out_path.display());
    Ok((out_path, stats))
}
