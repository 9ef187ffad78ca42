//! Trimming, quality-scale conversion and name fixups through the full
//! stack.

use crate::helpers::*;
use seqfeed_lib::config::{InputFormat, SourceConfig};
use tempfile::TempDir;

#[test]
fn test_trim_slices_sequence_and_qualities() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fq", "@r\nACGTACGT\n+\nABCDEFGH\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { trim5: 2, trim3: 1, ..config(InputFormat::Fastq) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    let read = &pairs[0].a;
    assert_eq!(read.seq, b"GTACG");
    assert_eq!(read.qual, b"CDEFG");
    assert_eq!(read.trimmed5, 2);
    assert_eq!(read.trimmed3, 1);
}

#[test]
fn test_phred64_rescaled_to_phred33() {
    let dir = TempDir::new().unwrap();
    // 'h' is Q40 on the phred+64 scale.
    let file = write_file(&dir, "in.fq", "@r\nACGT\n+\nhhhh\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { phred64: true, ..config(InputFormat::Fastq) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs[0].a.qual, b"IIII");
}

#[test]
fn test_solexa64_rescaled_to_phred33() {
    let dir = TempDir::new().unwrap();
    // ';' is solexa -5, which maps to phred 1 ('"').
    let file = write_file(&dir, "in.fq", "@r\nAC\n+\n;h\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { solexa64: true, ..config(InputFormat::Fastq) },
    );

    let pairs = drain(&composer);
    let scores: Vec<u8> = pairs[0].a.phred_scores().collect();
    assert_eq!(scores, vec![1, 40]);
}

#[test]
fn test_int_quals() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.tab", "r\tACGT\t40 40 0 93\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { int_quals: true, ..config(InputFormat::Tabbed5) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    let scores: Vec<u8> = pairs[0].a.phred_scores().collect();
    assert_eq!(scores, vec![40, 40, 0, 93]);
}

#[test]
fn test_int_quals_length_mismatch_skips_record() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.tab", "bad\tACGT\t40 40\nok\tAC\t40 40\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { int_quals: true, ..config(InputFormat::Tabbed5) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.name, b"ok");
}

#[test]
fn test_fix_name_applies_to_both_mates() {
    let dir = TempDir::new().unwrap();
    let r1 = write_file(&dir, "r1.fq", "@pair/1\nAA\n+\nII\n");
    let r2 = write_file(&dir, "r2.fq", "@pair/2\nTT\n+\nII\n");
    let composer = paired_composer(
        vec![r1],
        vec![r2],
        SourceConfig { fix_name: true, ..config(InputFormat::Fastq) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.name, b"pair");
    assert_eq!(pairs[0].b.as_ref().unwrap().name, b"pair");
}

#[test]
fn test_fastq_length_mismatch_skips_but_stream_continues() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fq", "@bad\nACGT\n+\nII\n@ok\nAC\n+\nII\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fastq));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.name, b"ok");
    // Skipped records are never granted an id.
    assert_eq!(pairs[0].a.id, 0);
}

#[test]
fn test_sequence_and_quality_lengths_always_match() {
    let dir = TempDir::new().unwrap();
    let fq = write_file(&dir, "in.fq", "@a\nACGTACGT\n+\nIIIIIIII\n");
    let fa = write_file(&dir, "in.fa", ">b\nACGTA\n");
    let raw = write_file(&dir, "in.raw", "GGGG\n");

    for (file, format) in [
        (fq, InputFormat::Fastq),
        (fa, InputFormat::Fasta),
        (raw, InputFormat::Raw),
    ] {
        let composer = singles_composer(
            vec![file],
            SourceConfig { trim5: 1, trim3: 2, ..config(format) },
        );
        for pair in drain(&composer) {
            assert_eq!(pair.a.seq.len(), pair.a.qual.len());
        }
    }
}
