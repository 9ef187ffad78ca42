#![deny(unsafe_code)]

//! Drain sequencing-read files through the ingestion engine.
//!
//! This binary stands in for an aligner: it spins up worker threads, pulls
//! every read (or pair) through the shared composer exactly as a search
//! thread would, and reports counts and throughput.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use parking_lot::Mutex;

use seqfeed_lib::composer::{InputFiles, build_composer};
use seqfeed_lib::config::{InputFormat, SourceConfig};
use seqfeed_lib::errors::SeqfeedError;
use seqfeed_lib::progress::ProgressTracker;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Fasta,
    Fastq,
    FastqInterleaved,
    Tab5,
    Tab6,
    Qseq,
    Raw,
    FastaContinuous,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => InputFormat::Fasta,
            FormatArg::Fastq => InputFormat::Fastq,
            FormatArg::FastqInterleaved => InputFormat::FastqInterleaved,
            FormatArg::Tab5 => InputFormat::Tabbed5,
            FormatArg::Tab6 => InputFormat::Tabbed6,
            FormatArg::Qseq => InputFormat::Qseq,
            FormatArg::Raw => InputFormat::Raw,
            FormatArg::FastaContinuous => InputFormat::FastaContinuous,
        }
    }
}

/// Stream sequencing reads the way an aligner consumes them.
#[derive(Parser, Debug)]
#[command(version, about = "Drain sequencing-read files through the ingestion engine")]
struct Args {
    /// Input format shared by all files.
    #[arg(long, value_enum, default_value = "fastq")]
    format: FormatArg,

    /// Unpaired read files.
    #[arg(short = 'U', long = "unpaired", value_delimiter = ',')]
    unpaired: Vec<PathBuf>,

    /// Mate-1 files, matched pairwise with --mates2.
    #[arg(short = '1', long = "mates1", value_delimiter = ',')]
    mates1: Vec<PathBuf>,

    /// Mate-2 files, matched pairwise with --mates1.
    #[arg(short = '2', long = "mates2", value_delimiter = ',')]
    mates2: Vec<PathBuf>,

    /// Files carrying both mates interleaved.
    #[arg(long = "interleaved", value_delimiter = ',')]
    interleaved: Vec<PathBuf>,

    /// Worker threads pulling reads.
    #[arg(short = 'p', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Reads light-parsed per lock acquisition.
    #[arg(long = "batch-size", default_value_t = 64)]
    batch_size: usize,

    /// Wrap each input file in its own source.
    #[arg(long = "file-parallel")]
    file_parallel: bool,

    /// Bases to hard-clip from the 5' end.
    #[arg(long = "trim5", default_value_t = 0)]
    trim5: usize,

    /// Bases to hard-clip from the 3' end.
    #[arg(long = "trim3", default_value_t = 0)]
    trim3: usize,

    /// Reads to discard at stream startup.
    #[arg(long = "skip", default_value_t = 0)]
    skip: u64,

    /// Qualities are on the phred+64 scale.
    #[arg(long = "phred64")]
    phred64: bool,

    /// Qualities are on the solexa+64 scale.
    #[arg(long = "solexa64")]
    solexa64: bool,

    /// Qualities are space-separated integers.
    #[arg(long = "int-quals")]
    int_quals: bool,

    /// Strip trailing /1 and /2 from read names.
    #[arg(long = "fix-name")]
    fix_name: bool,

    /// Window length for the fasta-continuous format.
    #[arg(long = "sample-len", default_value_t = 25)]
    sample_len: usize,

    /// Window stride for the fasta-continuous format.
    #[arg(long = "sample-freq", default_value_t = 1)]
    sample_freq: usize,

    /// Pseudo-random seed, passed through to downstream consumers.
    #[arg(long = "seed", default_value_t = 0)]
    seed: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.threads == 0 {
        bail!("at least one worker thread is required");
    }

    let config = Arc::new(SourceConfig {
        format: args.format.into(),
        file_parallel: args.file_parallel,
        seed: args.seed,
        max_buf: args.batch_size,
        solexa64: args.solexa64,
        phred64: args.phred64,
        int_quals: args.int_quals,
        trim5: args.trim5,
        trim3: args.trim3,
        sample_len: args.sample_len,
        sample_freq: args.sample_freq,
        skip: args.skip,
        nthreads: args.threads,
        fix_name: args.fix_name,
    });
    let inputs = InputFiles {
        singles: args.unpaired,
        mates1: args.mates1,
        mates2: args.mates2,
        interleaved: args.interleaved,
        ..InputFiles::default()
    };
    let composer = Arc::new(build_composer(&inputs, Arc::clone(&config))?);

    info!("Draining inputs with {} worker thread(s)", args.threads);
    let start = Instant::now();
    let reads = AtomicU64::new(0);
    let pairs = AtomicU64::new(0);
    let bases = AtomicU64::new(0);
    let progress = ProgressTracker::new("Ingested reads");
    let first_error: Mutex<Option<SeqfeedError>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for _ in 0..args.threads {
            let composer = Arc::clone(&composer);
            let (reads, pairs, bases) = (&reads, &pairs, &bases);
            let (progress, first_error) = (&progress, &first_error);
            scope.spawn(move || {
                for item in composer.reader() {
                    match item {
                        Ok(pair) => {
                            let mut n: u64 = 1;
                            let mut base_count = pair.a.len() as u64;
                            if let Some(mate) = &pair.b {
                                n += 1;
                                base_count += mate.len() as u64;
                                pairs.fetch_add(1, Ordering::Relaxed);
                            }
                            reads.fetch_add(n, Ordering::Relaxed);
                            bases.fetch_add(base_count, Ordering::Relaxed);
                            progress.add(n);
                        }
                        Err(e) => {
                            let mut slot = first_error.lock();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            break;
                        }
                    }
                }
            });
        }
    });

    if let Some(e) = first_error.into_inner() {
        return Err(e.into());
    }

    let elapsed = start.elapsed();
    progress.log_final();
    info!(
        "Ingested {} reads ({} pairs, {} bases) in {:.2?}",
        reads.load(Ordering::Relaxed),
        pairs.load(Ordering::Relaxed),
        bases.load(Ordering::Relaxed),
        elapsed
    );
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        info!("Throughput: {:.0} reads/s", reads.load(Ordering::Relaxed) as f64 / secs);
    }
    Ok(())
}
