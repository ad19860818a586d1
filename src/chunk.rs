//! Fixed-size chunking of an input stream.
//!
//! The reader keeps one block of lookahead so that an input ending exactly on
//! a chunk boundary marks its last full chunk as final instead of producing a
//! trailing empty chunk.

use std::io::{self, ErrorKind, Read};

/// A sequence-indexed slice of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the input, starting at 0.
    pub index: u64,
    /// Raw bytes of the chunk.
    pub data: Vec<u8>,
    /// True only for the last chunk of the stream.
    pub is_final: bool,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read up to `max_size` bytes from `source`.
///
/// Short reads are retried until the buffer is full or the source returns
/// `Ok(0)`, so a returned block shorter than `max_size` always means end of
/// stream.
pub fn read_block<R: Read>(source: &mut R, max_size: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; max_size];
    let mut filled = 0usize;
    while filled < max_size {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Pulls [`Chunk`]s from a byte source until exhaustion.
pub struct ChunkReader<R> {
    source: R,
    chunk_size: usize,
    next_index: u64,
    lookahead: Option<Vec<u8>>,
    exhausted: bool,
    finished: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(source: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            source,
            chunk_size,
            next_index: 0,
            lookahead: None,
            exhausted: false,
            finished: false,
        }
    }

    /// Returns the next chunk, or `None` once the final chunk was handed out.
    ///
    /// An empty source yields exactly one empty, final chunk.
    pub fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if self.finished {
            return Ok(None);
        }
        let data = match self.lookahead.take() {
            Some(block) => block,
            None => read_block(&mut self.source, self.chunk_size)?,
        };

        let is_final = if data.len() < self.chunk_size {
            self.exhausted = true;
            true
        } else {
            let next = read_block(&mut self.source, self.chunk_size)?;
            if next.is_empty() {
                self.exhausted = true;
                true
            } else {
                self.lookahead = Some(next);
                false
            }
        };

        let chunk = Chunk {
            index: self.next_index,
            data,
            is_final,
        };
        self.next_index += 1;
        self.finished = is_final;
        Ok(Some(chunk))
    }

    /// True once an end-of-stream read has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        interrupt_next: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            self.interrupt_next = true;
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn collect(data: Vec<u8>, chunk_size: usize) -> Vec<Chunk> {
        let mut reader = ChunkReader::new(Cursor::new(data), chunk_size);
        let mut out = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            out.push(chunk);
        }
        assert!(reader.is_exhausted());
        out
    }

    #[test]
    fn splits_with_short_tail() {
        let chunks = collect(vec![7u8; 10], 4);
        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![4, 4, 2]);
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            chunks.iter().map(|c| c.is_final).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn exact_boundary_marks_last_full_chunk_final() {
        let chunks = collect(vec![1u8; 12], 4);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() == 4));
        assert!(chunks[2].is_final);
        assert!(!chunks[1].is_final);
    }

    #[test]
    fn empty_source_yields_single_empty_final_chunk() {
        let chunks = collect(Vec::new(), 4);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
        assert!(chunks[0].is_final);
    }

    #[test]
    fn short_reads_are_not_end_of_stream() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut src = Trickle {
            data: data.clone(),
            pos: 0,
            step: 3,
            interrupt_next: false,
        };
        let block = read_block(&mut src, 64).unwrap();
        assert_eq!(block, data[..64].to_vec());
        let rest = read_block(&mut src, 64).unwrap();
        assert_eq!(rest, data[64..].to_vec());
    }

    #[test]
    fn nothing_after_final() {
        let mut reader = ChunkReader::new(Cursor::new(vec![0u8; 3]), 4);
        assert!(reader.next_chunk().unwrap().unwrap().is_final);
        assert!(reader.next_chunk().unwrap().is_none());
        assert!(reader.next_chunk().unwrap().is_none());
    }
}
