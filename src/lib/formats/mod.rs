//! The pluggable record-grammar layer.
//!
//! Every format implements the same two-operation contract:
//!
//! 1. **light-parse** (under the input lock): copy the raw bytes of up to a
//!    batch worth of records into per-thread slots, doing only the cheapest
//!    structural checks. Grammar violations skip the offending record and set
//!    the file's error flag so the diagnostic fires at most once per file.
//! 2. **parse** (outside the lock): decode a record's raw bytes into name,
//!    sequence and qualities, hard-clip, convert the quality scale and stamp
//!    the read id.
//!
//! Dispatch is a tagged enum with per-variant state rather than trait
//! objects; the source call site is a single match.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::batch::{Mate, ReadBatch};
use crate::config::{InputFormat, SourceConfig};
use crate::phred::{QualWarnings, SYNTHETIC_QUAL, decode_char_quals, decode_int_quals};
use crate::read::Read;
use crate::stream::ByteStream;

pub mod fasta;
pub mod fasta_continuous;
pub mod fastq;
pub mod qseq;
pub mod raw;
pub mod tabbed;

/// The currently open file as seen by a light-parse: its byte stream, its
/// once-per-file error latch and its path for diagnostics.
pub(crate) struct FileCtx<'a> {
    pub stream: &'a mut ByteStream,
    pub err: &'a AtomicBool,
    pub path: &'a Path,
}

impl FileCtx<'_> {
    /// Records a grammar problem, logging it the first time only.
    pub(crate) fn flag(&self, what: &str) {
        if !self.err.swap(true, Ordering::Relaxed) {
            log::error!("{}: {}; skipping malformed records", self.path.display(), what);
        }
    }
}

/// Everything a lock-free record decode needs.
pub(crate) struct ParseCtx<'a> {
    pub config: &'a SourceConfig,
    pub warnings: &'a QualWarnings,
}

/// Outcome of light-parsing a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rec {
    /// A record landed in the target slot
    Ok,
    /// The record was malformed and discarded; the slot is clean again
    Skip,
    /// The stream ended before a (complete) record appeared
    Eof,
}

/// One physical line as appended to a raw buffer.
pub(crate) struct LineRead {
    /// Content length excluding the line terminator (and any `\r`)
    pub len: usize,
    /// Whether end of stream was hit instead of a newline
    pub eof: bool,
}

/// Appends one line, including its `\n` when present, to `buf`.
pub(crate) fn append_line(stream: &mut ByteStream, buf: &mut Vec<u8>) -> io::Result<LineRead> {
    let start = buf.len();
    loop {
        match stream.get()? {
            None => {
                let len = content_len(&buf[start..]);
                return Ok(LineRead { len, eof: true });
            }
            Some(b'\n') => {
                let len = content_len(&buf[start..]);
                buf.push(b'\n');
                return Ok(LineRead { len, eof: false });
            }
            Some(byte) => buf.push(byte),
        }
    }
}

fn content_len(line: &[u8]) -> usize {
    if line.last() == Some(&b'\r') { line.len() - 1 } else { line.len() }
}

/// Strips one trailing `\n` (and a preceding `\r`) from a line slice.
pub(crate) fn trim_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Format-specific light-parse state, one variant per grammar.
#[derive(Debug)]
pub(crate) enum ReadFormat {
    Fasta,
    Fastq { interleaved: bool },
    Tabbed { second_name: bool },
    Qseq,
    Raw { ordinal: u64 },
    FastaContinuous(fasta_continuous::WindowState),
}

impl ReadFormat {
    pub(crate) fn new(config: &SourceConfig) -> Self {
        match config.format {
            InputFormat::Fasta => ReadFormat::Fasta,
            InputFormat::Fastq => ReadFormat::Fastq { interleaved: false },
            InputFormat::FastqInterleaved => ReadFormat::Fastq { interleaved: true },
            InputFormat::Tabbed5 => ReadFormat::Tabbed { second_name: false },
            InputFormat::Tabbed6 => ReadFormat::Tabbed { second_name: true },
            InputFormat::Qseq => ReadFormat::Qseq,
            InputFormat::Raw => ReadFormat::Raw { ordinal: 0 },
            InputFormat::FastaContinuous => {
                ReadFormat::FastaContinuous(fasta_continuous::WindowState::new(
                    config.sample_len,
                    config.sample_freq,
                ))
            }
        }
    }

    /// Light-parses up to `capacity - start` records from the open file.
    ///
    /// Returns `(done, count)` where `done` is true only when the file is
    /// fully drained with no partial record pending.
    pub(crate) fn light_parse_batch(
        &mut self,
        file: &mut FileCtx<'_>,
        batch: &mut ReadBatch,
        mate: Mate,
        start: usize,
    ) -> io::Result<(bool, usize)> {
        match self {
            ReadFormat::Fasta => fasta::light_parse_batch(file, batch, mate, start),
            ReadFormat::Fastq { interleaved } => {
                fastq::light_parse_batch(file, batch, mate, start, *interleaved)
            }
            ReadFormat::Tabbed { second_name } => {
                tabbed::light_parse_batch(file, batch, mate, start, *second_name)
            }
            ReadFormat::Qseq => qseq::light_parse_batch(file, batch, mate, start),
            ReadFormat::Raw { ordinal } => raw::light_parse_batch(file, batch, mate, start, ordinal),
            ReadFormat::FastaContinuous(window) => {
                window.light_parse_batch(file, batch, mate, start)
            }
        }
    }

    /// Resets per-file state when the source rotates to its next file.
    pub(crate) fn reset_for_next_file(&mut self) {
        match self {
            ReadFormat::Raw { ordinal } => *ordinal = 0,
            ReadFormat::FastaContinuous(window) => window.reset(),
            _ => {}
        }
    }
}

/// Decodes the record (or pair) held in `ra`/`rb`, dispatching on the
/// configured format. Runs outside any lock.
pub(crate) fn parse(ra: &mut Read, rb: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    match ctx.config.format {
        InputFormat::Fasta => parse_pairwise(fasta::parse_one, ra, rb, id, ctx),
        InputFormat::Fastq | InputFormat::FastqInterleaved => {
            parse_pairwise(fastq::parse_one, ra, rb, id, ctx)
        }
        InputFormat::Tabbed5 | InputFormat::Tabbed6 => tabbed::parse(ra, rb, id, ctx),
        InputFormat::Qseq => parse_pairwise(qseq::parse_one, ra, rb, id, ctx),
        InputFormat::Raw | InputFormat::FastaContinuous => {
            parse_pairwise(parse_synthetic_one, ra, rb, id, ctx)
        }
    }
}

/// Parses `ra`, then `rb` when its slot was filled (paired-file and
/// interleaved streams). A failure on either side skips the whole pair.
fn parse_pairwise(
    one: fn(&mut Read, u64, &ParseCtx<'_>) -> bool,
    ra: &mut Read,
    rb: &mut Read,
    id: u64,
    ctx: &ParseCtx<'_>,
) -> bool {
    if !one(ra, id, ctx) {
        rb.reset();
        return false;
    }
    if !rb.raw.is_empty() && !one(rb, id, ctx) {
        ra.reset();
        return false;
    }
    true
}

/// Decode for formats whose light-parse synthesized the name itself and
/// stored `name\tseq` in the raw buffer (raw lines, sampled windows).
fn parse_synthetic_one(read: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    let raw = std::mem::take(&mut read.raw);
    let Some(tab) = raw.iter().position(|&b| b == b'\t') else {
        read.reset();
        return false;
    };
    read.name.extend_from_slice(&raw[..tab]);
    read.seq.extend_from_slice(trim_eol(&raw[tab + 1..]));
    hard_clip(read, ctx.config.trim5, ctx.config.trim3);
    read.qual.resize(read.seq.len(), SYNTHETIC_QUAL);
    read.id = id;
    read.raw = raw;
    true
}

/// Applies the configured 5'/3' hard clips to sequence and (when present)
/// qualities, recording how much was actually removed.
pub(crate) fn hard_clip(read: &mut Read, trim5: usize, trim3: usize) {
    let t5 = trim5.min(read.seq.len());
    read.seq.drain(..t5);
    if !read.qual.is_empty() {
        let q5 = t5.min(read.qual.len());
        read.qual.drain(..q5);
    }
    let t3 = trim3.min(read.seq.len());
    let keep = read.seq.len() - t3;
    read.seq.truncate(keep);
    if read.qual.len() > keep {
        read.qual.truncate(keep);
    }
    read.trimmed5 = t5;
    read.trimmed3 = t3;
}

/// Strips a trailing `/1` or `/2` mate suffix from a read name.
pub(crate) fn fix_mate_name(name: &mut Vec<u8>) {
    if name.ends_with(b"/1") || name.ends_with(b"/2") {
        name.truncate(name.len() - 2);
    }
}

/// Decodes a quality field (char-encoded or integer-encoded) and checks its
/// length against the sequence, reporting through the once-per-source
/// latches. The decoded phred+33 string lands in `read.qual`.
pub(crate) fn decode_quals_checked(read: &mut Read, src: &[u8], ctx: &ParseCtx<'_>) -> bool {
    read.qual.clear();
    let ok = if ctx.config.int_quals {
        decode_int_quals(&mut read.qual, src, ctx.config.encoding())
    } else {
        decode_char_quals(&mut read.qual, src, ctx.config.encoding())
    };
    if !ok {
        ctx.warnings.wrong_format(&read.name);
        return false;
    }
    if read.qual.len() < read.seq.len() {
        ctx.warnings.too_few(&read.name);
        return false;
    }
    if read.qual.len() > read.seq.len() {
        ctx.warnings.too_many(&read.name);
        return false;
    }
    true
}

/// Writes a decimal integer into a raw buffer without allocating.
pub(crate) fn push_decimal(buf: &mut Vec<u8>, value: u64) {
    // Vec<u8> as io::Write never fails.
    let _ = write!(buf, "{value}");
}
