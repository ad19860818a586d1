//! Thin adapter over the zstd streaming API.
//!
//! Every call builds a private `CCtx`, so calls from different threads never
//! share codec state.

use thiserror::Error;
use zstd::zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd::zstd_safe::{self, CCtx, CParameter, InBuffer, OutBuffer};

/// Failure reported while compressing a single buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("failed to allocate a compression context")]
    ContextAlloc,
    #[error("zstd error: {0}")]
    Codec(&'static str),
    /// The codec did not finish the frame in one pass. The output buffer is
    /// sized from the codec bound, so this is a sizing bug rather than a
    /// recoverable condition.
    #[error("codec consumed {consumed} of {total} input bytes with {remaining} bytes left to flush")]
    PartialConsumption {
        consumed: usize,
        total: usize,
        remaining: usize,
    },
}

fn codec_error(code: zstd_safe::ErrorCode) -> CodecError {
    CodecError::Codec(zstd_safe::get_error_name(code))
}

/// Worst-case compressed size of a single frame holding `len` input bytes.
pub fn compressed_bound(len: usize) -> usize {
    zstd_safe::compress_bound(len)
}

/// Compress `input` into one complete zstd frame with a content checksum.
pub fn compress_frame(input: &[u8], level: i32) -> Result<Vec<u8>, CodecError> {
    let mut cctx = CCtx::try_create().ok_or(CodecError::ContextAlloc)?;
    cctx.set_parameter(CParameter::CompressionLevel(level))
        .map_err(codec_error)?;
    cctx.set_parameter(CParameter::ChecksumFlag(true))
        .map_err(codec_error)?;

    let mut dst: Vec<u8> = Vec::with_capacity(compressed_bound(input.len()));
    let mut src = InBuffer::around(input);
    let remaining = {
        let mut out = OutBuffer::around(&mut dst);
        cctx.compress_stream2(&mut out, &mut src, ZSTD_EndDirective::ZSTD_e_end)
            .map_err(codec_error)?
    };

    if src.pos() != input.len() || remaining != 0 {
        return Err(CodecError::PartialConsumption {
            consumed: src.pos(),
            total: input.len(),
            remaining,
        });
    }
    Ok(dst)
}

/// A valid frame with no payload, used when the input stream is empty.
pub fn empty_frame(level: i32) -> Result<Vec<u8>, CodecError> {
    compress_frame(&[], level)
}
