//! Configuration for the read ingestion engine.
//!
//! A single [`SourceConfig`] is shared (via `Arc`) by every source, composer
//! and per-thread reader in a run. All fields are plain data; validation
//! happens once, in [`SourceConfig::validate`], before any file is opened.

use crate::errors::{Result, SeqfeedError};
use crate::phred::QualityEncoding;

/// Largest window length accepted for [`InputFormat::FastaContinuous`].
pub const MAX_SAMPLE_LEN: usize = 1024;

/// The record grammar used by every input file in a run.
///
/// The format is fixed by configuration, never auto-detected from file
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `>name` header followed by sequence lines; qualities are synthetic
    Fasta,
    /// Four-line records: `@name`, sequence, `+`, quality
    Fastq,
    /// FASTQ with mate-1/mate-2 records alternating within one file
    FastqInterleaved,
    /// One tab-separated line per record: `name seq qual` or
    /// `name seq1 qual1 seq2 qual2`
    Tabbed5,
    /// Like [`InputFormat::Tabbed5`] but paired lines carry a second name:
    /// `name name2 seq1 qual1 seq2 qual2`
    Tabbed6,
    /// Illumina Qseq: eleven tab-separated fields per line
    Qseq,
    /// One bare nucleotide sequence per line
    Raw,
    /// Fixed-length windows sampled from long FASTA sequences
    FastaContinuous,
}

/// Parameters affecting how reads are read in.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Record grammar shared by all input files
    pub format: InputFormat,
    /// Wrap each file in its own source rather than one rotating source
    pub file_parallel: bool,
    /// Pseudo-random seed, threaded through for downstream consumers
    pub seed: u32,
    /// Reads to light-parse per lock acquisition (batch capacity)
    pub max_buf: usize,
    /// Qualities are on the solexa+64 scale
    pub solexa64: bool,
    /// Qualities are on the phred+64 scale
    pub phred64: bool,
    /// Qualities are space-separated integers rather than one char per base
    pub int_quals: bool,
    /// Bases to hard-clip from the 5' end after format decode
    pub trim5: usize,
    /// Bases to hard-clip from the 3' end after format decode
    pub trim3: usize,
    /// Window length for [`InputFormat::FastaContinuous`]
    pub sample_len: usize,
    /// Window stride for [`InputFormat::FastaContinuous`]
    pub sample_freq: usize,
    /// Reads to light-parse and discard at stream startup
    pub skip: u64,
    /// Worker thread count, advisory only (downstream buffer sizing)
    pub nthreads: usize,
    /// Strip trailing `/1` and `/2` from read names, both mates
    pub fix_name: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Fastq,
            file_parallel: false,
            seed: 0,
            max_buf: 64,
            solexa64: false,
            phred64: false,
            int_quals: false,
            trim5: 0,
            trim3: 0,
            sample_len: 25,
            sample_freq: 1,
            skip: 0,
            nthreads: 1,
            fix_name: false,
        }
    }
}

impl SourceConfig {
    /// Check parameter ranges and mutual exclusions.
    pub fn validate(&self) -> Result<()> {
        if self.max_buf == 0 {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "max-buf".to_string(),
                reason: "batch capacity must be at least 1".to_string(),
            });
        }
        if self.solexa64 && self.phred64 {
            return Err(SeqfeedError::InvalidParameter {
                parameter: "solexa64/phred64".to_string(),
                reason: "at most one quality scale may be selected".to_string(),
            });
        }
        if self.format == InputFormat::FastaContinuous {
            if self.sample_len == 0 || self.sample_len > MAX_SAMPLE_LEN {
                return Err(SeqfeedError::InvalidParameter {
                    parameter: "sample-len".to_string(),
                    reason: format!("must be between 1 and {MAX_SAMPLE_LEN}"),
                });
            }
            if self.sample_freq == 0 {
                return Err(SeqfeedError::InvalidParameter {
                    parameter: "sample-freq".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The character-quality scale selected by the `solexa64`/`phred64` flags.
    #[must_use]
    pub fn encoding(&self) -> QualityEncoding {
        if self.solexa64 {
            QualityEncoding::Solexa64
        } else if self.phred64 {
            QualityEncoding::Phred64
        } else {
            QualityEncoding::Phred33
        }
    }
}
