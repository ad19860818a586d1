use crate::error::{ParzstError, Result};

/// Bytes read per chunk.
pub const CHUNK_SIZE: usize = 16 * 1024;
/// Compression level used when none is given.
pub const DEFAULT_LEVEL: i32 = 1;
/// Worker count used when none is given.
pub const DEFAULT_WORKERS: usize = 4;

/// Runtime configuration for a compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// zstd compression level, 1 up to the codec's maximum.
    pub level: i32,
    /// Number of worker slots per wave.
    pub workers: usize,
    /// Fixed chunk size in bytes. Not exposed on the command line.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            workers: DEFAULT_WORKERS,
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl Config {
    pub fn new(level: i32, workers: usize) -> Self {
        Self {
            level,
            workers,
            ..Self::default()
        }
    }

    /// Check the values before any I/O is attempted.
    pub fn validate(&self) -> Result<()> {
        let max_level = *zstd::compression_level_range().end();
        if self.level < 1 || self.level > max_level {
            return Err(ParzstError::Config(format!(
                "compression level {} out of range 1..={}",
                self.level, max_level
            )));
        }
        if self.workers == 0 {
            return Err(ParzstError::Config("worker count must be positive".into()));
        }
        if self.chunk_size == 0 {
            return Err(ParzstError::Config("chunk size must be positive".into()));
        }
        Ok(())
    }
}
