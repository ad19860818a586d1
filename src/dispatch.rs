//! Wave-barrier dispatcher.
//!
//! Each wave collects up to `workers` chunks, launches one thread per
//! non-empty chunk, joins all of them, and only then hands the results to the
//! assembler. No chunk of the next wave is read past the reader's one-block
//! lookahead or compressed before the current wave is written.

use std::io::{Read, Write};
use std::thread::{self, JoinHandle};

use indicatif::ProgressBar;
use log::{debug, trace};

use crate::assemble::OutputAssembler;
use crate::chunk::{Chunk, ChunkReader};
use crate::config::Config;
use crate::error::{ParzstError, Result};
use crate::stats::CompressionStats;
use crate::worker::{self, WorkItem, WorkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveState {
    Idle,
    Filling,
    Running,
    Draining,
    Done,
}

type Launched = Vec<(u64, JoinHandle<Result<WorkResult>>)>;

pub struct Dispatcher<R: Read, W: Write> {
    reader: ChunkReader<R>,
    assembler: OutputAssembler<W>,
    workers: usize,
    level: i32,
    state: WaveState,
    stats: CompressionStats,
    progress: ProgressBar,
}

impl<R: Read, W: Write> Dispatcher<R, W> {
    pub fn new(source: R, sink: W, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: ChunkReader::new(source, config.chunk_size),
            assembler: OutputAssembler::new(sink, config.level),
            workers: config.workers,
            level: config.level,
            state: WaveState::Idle,
            stats: CompressionStats::new(),
            progress: ProgressBar::hidden(),
        })
    }

    /// Advance `bar` by the number of input bytes read.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    pub fn stats(&self) -> &CompressionStats {
        &self.stats
    }

    fn transition(&mut self, next: WaveState) {
        trace!("wave {}: {:?} -> {:?}", self.stats.waves, self.state, next);
        self.state = next;
    }

    /// Run one full wave. Returns the state the dispatcher ends in, either
    /// `Idle` or `Done`.
    pub fn run_wave(&mut self) -> Result<WaveState> {
        if self.state == WaveState::Done {
            return Ok(WaveState::Done);
        }

        let wave = self.fill()?;
        let (first_index, next_index, reached_final) = match (wave.first(), wave.last()) {
            (Some(first), Some(last)) => (first.index, last.index + 1, last.is_final),
            _ => {
                return Err(ParzstError::Internal(
                    "reader ran dry before a final chunk".into(),
                ))
            }
        };
        debug_assert!(wave.len() <= self.workers);
        self.stats.tick_wave(wave.len());

        let launched = self.launch(wave)?;
        let dispatched = launched.len();
        let results = self.drain(launched)?;
        for result in &results {
            self.stats.log_result(result.index, result.finalizes);
        }
        debug!(
            "wave {}: chunks {}..{} ({} dispatched)",
            self.stats.waves,
            first_index,
            next_index,
            dispatched
        );

        self.assembler.write_wave(first_index, results)?;
        self.assembler.skip_to(next_index);

        self.transition(if reached_final {
            WaveState::Done
        } else {
            WaveState::Idle
        });
        Ok(self.state)
    }

    /// Compress the whole stream and return the sink with run statistics.
    pub fn run(mut self) -> Result<(W, CompressionStats)> {
        while self.run_wave()? != WaveState::Done {}
        self.progress.finish_and_clear();

        let Dispatcher {
            assembler,
            mut stats,
            ..
        } = self;
        let (sink, written) = assembler.finish()?;
        stats.finish(written);
        Ok((sink, stats))
    }

    fn fill(&mut self) -> Result<Vec<Chunk>> {
        self.transition(WaveState::Filling);
        let mut wave = Vec::new();
        while wave.len() < self.workers {
            let Some(chunk) = self.reader.next_chunk()? else {
                break;
            };
            self.stats.tick_chunk(chunk.len(), chunk.is_final);
            self.progress.inc(chunk.len() as u64);
            let is_final = chunk.is_final;
            wave.push(chunk);
            if is_final {
                break;
            }
        }
        Ok(wave)
    }

    fn launch(&mut self, wave: Vec<Chunk>) -> Result<Launched> {
        self.transition(WaveState::Running);
        let mut launched: Launched = Vec::with_capacity(wave.len());
        for (slot, chunk) in wave.into_iter().enumerate() {
            if chunk.is_empty() {
                trace!("chunk {} is empty, not dispatched", chunk.index);
                continue;
            }
            let index = chunk.index;
            let item = WorkItem::new(slot, chunk, self.level);
            let spawned = thread::Builder::new()
                .name(format!("parzst-worker-{slot}"))
                .spawn(move || worker::run(item));
            match spawned {
                Ok(handle) => launched.push((index, handle)),
                Err(e) => {
                    // Launched workers cannot be cancelled; wait them out.
                    for (_, handle) in launched {
                        let _ = handle.join();
                    }
                    return Err(e.into());
                }
            }
        }
        Ok(launched)
    }

    /// Join every launched worker in slot order. The first failure is
    /// returned only after the whole wave has terminated.
    fn drain(&mut self, launched: Launched) -> Result<Vec<WorkResult>> {
        self.transition(WaveState::Draining);
        let mut results = Vec::with_capacity(launched.len());
        let mut failure = None;
        for (index, handle) in launched {
            let outcome = handle
                .join()
                .unwrap_or(Err(ParzstError::WorkerPanicked { index }));
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}
