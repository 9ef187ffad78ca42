//! The synchronized, file-rotating record source.
//!
//! A [`ReadSource`] owns an ordered list of input files, the open byte
//! stream, the per-format light-parse state and the read counter. All of
//! that sits behind one mutex; [`ReadSource::next_batch`] is the only
//! critical section in the engine. Decoding ([`ReadSource::parse`]) touches
//! none of the locked state and runs concurrently on worker threads.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::batch::{Mate, ReadBatch};
use crate::config::SourceConfig;
use crate::errors::{Result, SeqfeedError};
use crate::formats::{self, FileCtx, ParseCtx, ReadFormat};
use crate::phred::QualWarnings;
use crate::read::Read;
use crate::stream::ByteStream;

/// A synchronized source of light-parsed read batches.
pub struct ReadSource {
    config: Arc<SourceConfig>,
    /// One "already reported" latch per input file
    errs: Vec<AtomicBool>,
    warnings: QualWarnings,
    state: Mutex<SourceState>,
}

struct SourceState {
    files: Vec<PathBuf>,
    /// Index of the next file to open; the open one is `file_cur - 1`
    file_cur: usize,
    stream: Option<ByteStream>,
    format: ReadFormat,
    /// Reads light-parsed so far; the basis for id reservation
    read_cnt: u64,
    skip_remaining: u64,
}

impl ReadSource {
    /// Creates a source over `files`, which are opened lazily in order.
    pub fn new(files: Vec<PathBuf>, config: Arc<SourceConfig>) -> Result<Self> {
        if files.is_empty() {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "input files".to_string(),
                reason: "a source needs at least one file".to_string(),
            });
        }
        let errs = files.iter().map(|_| AtomicBool::new(false)).collect();
        let state = SourceState {
            file_cur: 0,
            stream: None,
            format: ReadFormat::new(&config),
            read_cnt: 0,
            skip_remaining: config.skip,
            files,
        };
        Ok(Self { config, errs, warnings: QualWarnings::default(), state: Mutex::new(state) })
    }

    /// Light-parses the next batch of records into `batch` under the source
    /// mutex, reserving a contiguous id range for them.
    ///
    /// Returns `(done, count)`; `done` is true only once every file is fully
    /// drained. `count` may be positive alongside `done`, in which case the
    /// caller consumes those records before honoring the end of stream.
    /// Batches span files: when a file ends with room left in the batch, the
    /// source rotates to the next file and keeps filling in the same call.
    pub fn next_batch(&self, batch: &mut ReadBatch, mate: Mate) -> Result<(bool, usize)> {
        let mut state = self.state.lock();
        if state.skip_remaining > 0 {
            self.discard_skipped(&mut state)?;
        }
        let base = state.read_cnt;
        let (done, count) = self.fill(&mut state, batch, mate, 0)?;
        if mate == Mate::A {
            batch.set_base_id(base);
        }
        state.read_cnt += count as u64;
        Ok((done, count))
    }

    /// The shared fill loop: open files as needed, light-parse, rotate.
    fn fill(
        &self,
        state: &mut SourceState,
        batch: &mut ReadBatch,
        mate: Mate,
        start: usize,
    ) -> Result<(bool, usize)> {
        let mut readi = start;
        loop {
            if state.stream.is_none() {
                if state.file_cur >= state.files.len() {
                    return Ok((true, readi - start));
                }
                let path = &state.files[state.file_cur];
                let stream = ByteStream::open(path).map_err(|e| SeqfeedError::Open {
                    path: path.display().to_string(),
                    source: e,
                })?;
                state.stream = Some(stream);
                state.file_cur += 1;
            }
            let file_idx = state.file_cur - 1;
            let SourceState { files, stream, format, .. } = &mut *state;
            let Some(open_stream) = stream.as_mut() else {
                return Ok((true, readi - start));
            };
            let mut file =
                FileCtx { stream: open_stream, err: &self.errs[file_idx], path: &files[file_idx] };
            let (file_done, count) = format
                .light_parse_batch(&mut file, batch, mate, readi)
                .map_err(|e| SeqfeedError::Io {
                    path: files[file_idx].display().to_string(),
                    source: e,
                })?;
            readi += count;
            if file_done {
                state.stream = None;
                state.format.reset_for_next_file();
                if state.file_cur >= state.files.len() {
                    return Ok((true, readi - start));
                }
            }
            if readi >= batch.capacity() {
                return Ok((false, readi - start));
            }
        }
    }

    /// Light-parses and discards the configured number of startup reads.
    /// Their ids are consumed, so the first read handed to a worker carries
    /// id `skip`.
    fn discard_skipped(&self, state: &mut SourceState) -> Result<()> {
        while state.skip_remaining > 0 {
            let want = state.skip_remaining.min(self.config.max_buf as u64) as usize;
            let mut scratch = ReadBatch::new(want);
            let (done, count) = self.fill(state, &mut scratch, Mate::A, 0)?;
            state.read_cnt += count as u64;
            state.skip_remaining -= count as u64;
            if done {
                state.skip_remaining = 0;
            }
        }
        Ok(())
    }

    /// Decodes one record (or pair) outside the critical section.
    pub fn parse(&self, ra: &mut Read, rb: &mut Read, id: u64) -> bool {
        let ctx = ParseCtx { config: &self.config, warnings: &self.warnings };
        formats::parse(ra, rb, id, &ctx)
    }

    /// Rewinds to the first file and clears the counters. Only the master
    /// thread may call this, and only while no worker is pulling batches.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.file_cur = 0;
        state.stream = None;
        state.read_cnt = 0;
        state.skip_remaining = self.config.skip;
        state.format = ReadFormat::new(&self.config);
        for err in &self.errs {
            err.store(false, Ordering::Relaxed);
        }
    }

    /// Number of reads light-parsed by this source so far.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.state.lock().read_cnt
    }

    pub(crate) fn config(&self) -> &Arc<SourceConfig> {
        &self.config
    }
}
