//! Counters collected while a stream is compressed.

use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct CompressionStats {
    #[serde(skip)]
    start_time: Instant,
    /// Chunks read from the input, including an empty final chunk.
    pub chunks: u64,
    /// Chunks handed to a worker.
    pub dispatched: u64,
    pub waves: u64,
    /// Largest number of chunks collected into one wave.
    pub widest_wave: usize,
    /// Chunks the reader marked final.
    pub final_chunks: u64,
    /// Index of the chunk that closed the stream, if any was dispatched.
    pub finalized_by: Option<u64>,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub elapsed_ms: u64,
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            chunks: 0,
            dispatched: 0,
            waves: 0,
            widest_wave: 0,
            final_chunks: 0,
            finalized_by: None,
            input_bytes: 0,
            output_bytes: 0,
            elapsed_ms: 0,
        }
    }

    pub fn tick_chunk(&mut self, len: usize, is_final: bool) {
        self.chunks += 1;
        self.input_bytes += len as u64;
        if is_final {
            self.final_chunks += 1;
        }
    }

    pub fn tick_wave(&mut self, width: usize) {
        self.waves += 1;
        self.widest_wave = self.widest_wave.max(width);
    }

    pub fn log_result(&mut self, index: u64, finalizes: bool) {
        self.dispatched += 1;
        if finalizes {
            self.finalized_by = Some(index);
        }
    }

    pub fn finish(&mut self, output_bytes: u64) {
        self.output_bytes = output_bytes;
        self.elapsed_ms = self.start_time.elapsed().as_millis() as u64;
    }

    /// Output size as a percentage of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 * 100.0 / self.input_bytes as f64
    }

    pub fn report(&self) {
        eprintln!(
            "{} -> {} bytes ({:.2}%), {} chunks in {} waves, {} ms",
            self.input_bytes,
            self.output_bytes,
            self.ratio(),
            self.chunks,
            self.waves,
            self.elapsed_ms
        );
    }
}
