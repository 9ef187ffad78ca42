//! Composition of read sources, and the factory that builds the composer
//! tree from input file lists.
//!
//! A [`Composer`] is the single object worker threads share. The solo
//! variant rotates through independent single-mate sources, leaning on each
//! child's own mutex. The dual variant holds two lockstep source lists (one
//! per mate file) plus its own mutex, so that the mate-1 and mate-2 batches
//! of a pair are reserved atomically; a count or end-of-stream disagreement
//! between the two sides is a fatal desynchronization.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::batch::{Mate, ReadBatch};
use crate::config::{InputFormat, SourceConfig};
use crate::driver::ReadPairIter;
use crate::errors::{Result, SeqfeedError};
use crate::read::Read;
use crate::source::ReadSource;
use crate::validation::validate_files_exist;

/// The input file lists a run is built from, as they arrive from the
/// command line or a configuration layer.
#[derive(Debug, Clone, Default)]
pub struct InputFiles {
    /// Unpaired read files
    pub singles: Vec<PathBuf>,
    /// Mate-1 files, matched pairwise with `mates2`
    pub mates1: Vec<PathBuf>,
    /// Mate-2 files, matched pairwise with `mates1`
    pub mates2: Vec<PathBuf>,
    /// Files carrying both mates interleaved
    pub interleaved: Vec<PathBuf>,
    /// Separate quality files for `singles` (accepted, ignored)
    pub quals: Vec<PathBuf>,
    /// Separate quality files for `mates1` (accepted, ignored)
    pub quals1: Vec<PathBuf>,
    /// Separate quality files for `mates2` (accepted, ignored)
    pub quals2: Vec<PathBuf>,
}

enum ComposerKind {
    Solo { sources: Vec<ReadSource>, cur: AtomicUsize },
    Dual { cur: Mutex<usize>, src_a: Vec<ReadSource>, src_b: Vec<ReadSource> },
}

/// The synchronized root of a run's source tree.
pub struct Composer {
    kind: ComposerKind,
    config: Arc<SourceConfig>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer").finish_non_exhaustive()
    }
}

impl Composer {
    /// Pulls the next batch for a worker, delegating to the source (solo) or
    /// source pair (dual) at the round-robin cursor.
    pub fn next_batch(&self, batch: &mut ReadBatch) -> Result<(bool, usize)> {
        match &self.kind {
            ComposerKind::Solo { sources, cur } => loop {
                let i = cur.load(Ordering::Acquire);
                if i >= sources.len() {
                    return Ok((true, 0));
                }
                let (done, count) = sources[i].next_batch(batch, Mate::A)?;
                if done && count == 0 {
                    // This source is spent; several workers may race to
                    // advance the cursor, only one wins.
                    let _ = cur.compare_exchange(i, i + 1, Ordering::AcqRel, Ordering::Acquire);
                    continue;
                }
                return Ok((done && i + 1 >= sources.len(), count));
            },
            ComposerKind::Dual { cur, src_a, src_b } => {
                let mut cur = cur.lock();
                loop {
                    if *cur >= src_a.len() {
                        return Ok((true, 0));
                    }
                    let (done_a, count_a) = src_a[*cur].next_batch(batch, Mate::A)?;
                    let (done_b, count_b) = src_b[*cur].next_batch(batch, Mate::B)?;
                    if count_a != count_b || done_a != done_b {
                        return Err(SeqfeedError::PairMismatch {
                            count_a,
                            done_a,
                            count_b,
                            done_b,
                        });
                    }
                    if done_a && count_a == 0 {
                        *cur += 1;
                        continue;
                    }
                    return Ok((done_a && *cur + 1 >= src_a.len(), count_a));
                }
            }
        }
    }

    /// Decodes one record (or pair) through the format layer, outside any
    /// lock. The grammar is uniform across a run, so the first source's
    /// decoder serves every record.
    pub fn parse(&self, ra: &mut Read, rb: &mut Read, id: u64) -> bool {
        match &self.kind {
            ComposerKind::Solo { sources, .. } => sources[0].parse(ra, rb, id),
            ComposerKind::Dual { src_a, .. } => src_a[0].parse(ra, rb, id),
        }
    }

    /// Rewinds every source so the next batch is the very first one. Master
    /// thread only, with no workers active.
    pub fn reset(&self) {
        match &self.kind {
            ComposerKind::Solo { sources, cur } => {
                for source in sources {
                    source.reset();
                }
                cur.store(0, Ordering::Release);
            }
            ComposerKind::Dual { cur, src_a, src_b } => {
                let mut cur = cur.lock();
                for source in src_a.iter().chain(src_b.iter()) {
                    source.reset();
                }
                *cur = 0;
            }
        }
    }

    /// Total reads light-parsed so far (pairs count once).
    #[must_use]
    pub fn read_count(&self) -> u64 {
        match &self.kind {
            ComposerKind::Solo { sources, .. } => sources.iter().map(ReadSource::read_count).sum(),
            ComposerKind::Dual { src_a, .. } => src_a.iter().map(ReadSource::read_count).sum(),
        }
    }

    /// Mints a per-worker pull iterator sharing this composer.
    #[must_use]
    pub fn reader(self: &Arc<Self>) -> ReadPairIter {
        ReadPairIter::new(Arc::clone(self))
    }

    /// The run configuration this composer was built with.
    #[must_use]
    pub fn config(&self) -> &Arc<SourceConfig> {
        &self.config
    }
}

/// Builds the composer tree for the given inputs.
///
/// Mate-1/mate-2 lists must be the same length and select the dual composer,
/// one source per file so the two sides stay in lockstep. Interleaved files
/// select a solo composer over the interleaved FASTQ grammar. Otherwise the
/// unpaired files are used, either one source per file (`file_parallel`) or
/// a single rotating source.
pub fn build_composer(inputs: &InputFiles, config: Arc<SourceConfig>) -> Result<Composer> {
    config.validate()?;
    if !inputs.quals.is_empty() || !inputs.quals1.is_empty() || !inputs.quals2.is_empty() {
        log::warn!("Separate quality files are ignored; qualities come from the read files");
    }
    if inputs.mates1.len() != inputs.mates2.len() {
        return Err(SeqfeedError::InvalidParameter {
            parameter: "mates1/mates2".to_string(),
            reason: format!(
                "the same number of mate-1 and mate-2 files is required ({} vs {})",
                inputs.mates1.len(),
                inputs.mates2.len()
            ),
        });
    }

    let kind = if !inputs.mates1.is_empty() {
        if !inputs.singles.is_empty() || !inputs.interleaved.is_empty() {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "inputs".to_string(),
                reason: "paired mate files cannot be combined with unpaired or interleaved inputs"
                    .to_string(),
            });
        }
        if matches!(
            config.format,
            InputFormat::Tabbed5
                | InputFormat::Tabbed6
                | InputFormat::FastqInterleaved
                | InputFormat::FastaContinuous
        ) {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "format".to_string(),
                reason: "this format cannot be combined with parallel mate files".to_string(),
            });
        }
        validate_files_exist(&inputs.mates1, "mate-1 input")?;
        validate_files_exist(&inputs.mates2, "mate-2 input")?;
        let src_a = per_file_sources(&inputs.mates1, &config)?;
        let src_b = per_file_sources(&inputs.mates2, &config)?;
        ComposerKind::Dual { cur: Mutex::new(0), src_a, src_b }
    } else if !inputs.interleaved.is_empty() {
        if config.format != InputFormat::FastqInterleaved {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "interleaved".to_string(),
                reason: "interleaved input files require the interleaved FASTQ format".to_string(),
            });
        }
        validate_files_exist(&inputs.interleaved, "interleaved input")?;
        solo_kind(&inputs.interleaved, &config)?
    } else {
        if inputs.singles.is_empty() {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "inputs".to_string(),
                reason: "no input files given".to_string(),
            });
        }
        validate_files_exist(&inputs.singles, "read input")?;
        solo_kind(&inputs.singles, &config)?
    };
    Ok(Composer { kind, config })
}

fn per_file_sources(files: &[PathBuf], config: &Arc<SourceConfig>) -> Result<Vec<ReadSource>> {
    files.iter().map(|f| ReadSource::new(vec![f.clone()], Arc::clone(config))).collect()
}

fn solo_kind(files: &[PathBuf], config: &Arc<SourceConfig>) -> Result<ComposerKind> {
    let sources = if config.file_parallel {
        per_file_sources(files, config)?
    } else {
        vec![ReadSource::new(files.to_vec(), Arc::clone(config))?]
    };
    Ok(ComposerKind::Solo { sources, cur: AtomicUsize::new(0) })
}
