#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # seqfeed - sequencing-read ingestion engine
//!
//! This library turns one or more read files, possibly gzip-compressed and in
//! any of several textual formats, into a stream of typed read records (or
//! read pairs) suitable for feeding a multi-threaded aligner.
//!
//! ## Overview
//!
//! The engine is built around a two-phase parsing protocol. Worker threads
//! pull *batches* of raw records from a shared, synchronized source: under the
//! source lock only the cheap work happens (copying the bytes that make up
//! each record into per-thread storage). The expensive work of decoding names,
//! sequences and qualities, hard-clipping and quality-scale conversion runs
//! outside any lock, on the worker's own copy of the bytes.
//!
//! Key modules:
//!
//! - **[`read`]** - the in-memory read record
//! - **[`batch`]** - the per-thread double buffer of raw records
//! - **[`stream`]** - a byte stream over plain and gzip files with pushback
//! - **[`formats`]** - light-parse and decode for FASTA, FASTQ (plain and
//!   interleaved), tabbed, Qseq, raw and windowed-FASTA inputs
//! - **[`source`]** - the synchronized, file-rotating record source
//! - **[`composer`]** - single-file and paired-file composition plus the
//!   factory that builds a composer from input file lists
//! - **[`driver`]** - the per-thread pull iterator handed to workers
//! - **[`phred`]** - quality-scale conversions to phred+33
//!
//! ## Quick start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use seqfeed_lib::composer::{build_composer, InputFiles};
//! use seqfeed_lib::config::{InputFormat, SourceConfig};
//!
//! # fn main() -> seqfeed_lib::errors::Result<()> {
//! let config = Arc::new(SourceConfig { format: InputFormat::Fastq, ..SourceConfig::default() });
//! let inputs = InputFiles { singles: vec![PathBuf::from("reads.fq.gz")], ..InputFiles::default() };
//! let composer = Arc::new(build_composer(&inputs, config)?);
//!
//! // One reader per worker thread; each pulls batches on demand.
//! for pair in composer.reader() {
//!     let pair = pair?;
//!     let _ = pair.a.seq.len();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Read ids are assigned in contiguous ranges under the source lock, so the
//! id sequence is a total order over all emitted reads matching the order
//! records appear in the logical concatenation of the input files. There is
//! no ordering guarantee *across* worker threads; downstream consumers sort
//! by id when submission order matters.

pub mod batch;
pub mod composer;
pub mod config;
pub mod driver;
pub mod errors;
pub mod formats;
pub mod phred;
pub mod progress;
pub mod read;
pub mod source;
pub mod stream;
pub mod validation;

pub use batch::ReadBatch;
pub use composer::{Composer, InputFiles, build_composer};
pub use config::{InputFormat, SourceConfig};
pub use driver::{ReadPair, ReadPairIter};
pub use read::Read;
