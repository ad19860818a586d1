use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Error, Debug)]
pub enum ParzstError {
    /// Invalid level, worker count or chunk size.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O error (read, write, open or thread spawn).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Opening or creating one of the run's files failed.
    #[error("{operation} '{}': {source}", path.display())]
    File {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The codec rejected a chunk or left part of it unconsumed.
    #[error("codec error on chunk {index}: {source}")]
    Codec {
        index: u64,
        #[source]
        source: CodecError,
    },

    /// A worker thread panicked before producing a result.
    #[error("worker for chunk {index} panicked")]
    WorkerPanicked { index: u64 },

    /// Broken ordering invariant between dispatcher and assembler.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ParzstError>;
