//! End-to-end coverage of each record grammar over single-mate streams.

use std::sync::Arc;

use crate::helpers::*;
use seqfeed_lib::composer::{InputFiles, build_composer};
use seqfeed_lib::config::{InputFormat, SourceConfig};
use tempfile::TempDir;

#[test]
fn test_fastq_single() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fq", "@r1\nACGT\n+\nIIII\n@r2\nNN\n+\n!!\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fastq));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);

    assert_eq!(pairs[0].a.id, 0);
    assert_eq!(pairs[0].a.name, b"r1");
    assert_eq!(pairs[0].a.seq, b"ACGT");
    assert_eq!(pairs[0].a.phred_scores().collect::<Vec<_>>(), vec![40, 40, 40, 40]);
    // The decoded record still carries the bytes it was light-parsed from.
    assert_eq!(pairs[0].a.raw, b"@r1\nACGT\n+\nIIII\n");

    assert_eq!(pairs[1].a.id, 1);
    assert_eq!(pairs[1].a.name, b"r2");
    assert_eq!(pairs[1].a.seq, b"NN");
    assert_eq!(pairs[1].a.phred_scores().collect::<Vec<_>>(), vec![0, 0]);

    for pair in &pairs {
        assert!(!pair.is_paired());
        assert_eq!(pair.a.seq.len(), pair.a.qual.len());
        assert!(pair.a.filter_passed);
    }
}

#[test]
fn test_fasta_synthetic_qualities() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fa", ">one\nACGT\nAC\n\n>two desc\nNNNN\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fasta));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].a.name, b"one");
    assert_eq!(pairs[0].a.seq, b"ACGTAC");
    assert_eq!(pairs[0].a.qual, b"IIIIII");
    assert_eq!(pairs[1].a.name, b"two desc");
    assert_eq!(pairs[1].a.seq, b"NNNN");
}

#[test]
fn test_fasta_missing_marker_recovers() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fa", "stray text\n>ok\nACGT\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fasta));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.name, b"ok");
    assert_eq!(pairs[0].a.id, 0);
}

#[test]
fn test_raw_ordinal_names() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.raw", "ACGT\nTTAA\n");
    let composer = singles_composer(vec![file], config(InputFormat::Raw));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].a.name, b"0");
    assert_eq!(pairs[0].a.seq, b"ACGT");
    assert_eq!(pairs[0].a.qual, b"IIII");
    assert_eq!(pairs[1].a.name, b"1");
    assert_eq!(pairs[1].a.seq, b"TTAA");
}

#[test]
fn test_tabbed6_pair() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.tab", "p\tpm\tACGT\tIIII\tTGCA\tIIII\n");
    let composer = singles_composer(vec![file], config(InputFormat::Tabbed6));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert!(pair.is_paired());
    assert_eq!(pair.a.name, b"p");
    assert_eq!(pair.a.seq, b"ACGT");
    let b = pair.b.as_ref().unwrap();
    assert_eq!(b.name, b"pm");
    assert_eq!(b.seq, b"TGCA");
    assert_eq!(pair.a.mate, 1);
    assert_eq!(b.mate, 2);
    assert_eq!(pair.a.id, b.id);
}

#[test]
fn test_tabbed5_mixes_singles_and_pairs() {
    let dir = TempDir::new().unwrap();
    let file =
        write_file(&dir, "in.tab", "s\tACGT\tIIII\np\tAA\tII\tTT\tII\n");
    let composer = singles_composer(vec![file], config(InputFormat::Tabbed5));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);
    assert!(!pairs[0].is_paired());
    assert!(pairs[1].is_paired());
    assert_eq!(pairs[1].a.name, b"p");
    assert_eq!(pairs[1].b.as_ref().unwrap().name, b"p");
}

#[test]
fn test_qseq_filter_field_tags_but_keeps_records() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "in.qseq",
        "M\t1\t2\t3\t4\t5\t0\t1\tACGT\tIIII\t1\nM\t1\t2\t3\t4\t6\t0\t1\tTTTT\tIIII\t0\n",
    );
    let composer = singles_composer(vec![file], config(InputFormat::Qseq));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].a.name, b"M_1:2:3:4:5#0/1");
    assert!(pairs[0].a.filter_passed);
    assert!(!pairs[1].a.filter_passed);
    // Ids advance regardless of the filter flag.
    assert_eq!(pairs[0].a.id, 0);
    assert_eq!(pairs[1].a.id, 1);
}

#[test]
fn test_batches_span_files() {
    // A tail file holding a single short record must still be picked up by
    // the batch started in the first file.
    let dir = TempDir::new().unwrap();
    let f1 = write_file(&dir, "a.fq", "@r0\nAA\n+\nII\n@r1\nCC\n+\nII\n");
    let f2 = write_file(&dir, "b.fq", "@r2\nGG\n+\nII\n");
    let composer = singles_composer(vec![f1, f2], config(InputFormat::Fastq));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 3);
    let names: Vec<Vec<u8>> = pairs.iter().map(|p| p.a.name.clone()).collect();
    assert_eq!(names, vec![b"r0".to_vec(), b"r1".to_vec(), b"r2".to_vec()]);
    let ids: Vec<u64> = pairs.iter().map(|p| p.a.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_gzip_input() {
    let dir = TempDir::new().unwrap();
    let file = write_gzip(&dir, "in.fq.gz", "@r1\nACGT\n+\nIIII\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fastq));

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.seq, b"ACGT");
}

#[test]
fn test_skip_discards_startup_reads_but_consumes_ids() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fq", "@r0\nAA\n+\nII\n@r1\nCC\n+\nII\n@r2\nGG\n+\nII\n");
    let composer = singles_composer(
        vec![file],
        SourceConfig { skip: 2, ..config(InputFormat::Fastq) },
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].a.name, b"r2");
    assert_eq!(pairs[0].a.id, 2);
}

#[test]
fn test_reset_replays_the_stream() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fq", "@r0\nAA\n+\nII\n@r1\nCC\n+\nII\n");
    let composer = singles_composer(vec![file], config(InputFormat::Fastq));

    let first = drain(&composer);
    assert_eq!(composer.read_count(), 2);
    composer.reset();
    assert_eq!(composer.read_count(), 0);
    let second = drain(&composer);

    assert_eq!(first.len(), second.len());
    for (x, y) in first.iter().zip(second.iter()) {
        assert_eq!(x.a.id, y.a.id);
        assert_eq!(x.a.name, y.a.name);
        assert_eq!(x.a.seq, y.a.seq);
    }
}

#[test]
fn test_fastq_interleaved_stream() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "in.fq",
        "@p0/1\nAA\n+\nII\n@p0/2\nTT\n+\nII\n@p1/1\nCC\n+\nII\n@p1/2\nGG\n+\nII\n",
    );
    let inputs = InputFiles { interleaved: vec![file], ..InputFiles::default() };
    let composer = Arc::new(
        build_composer(&inputs, Arc::new(config(InputFormat::FastqInterleaved))).unwrap(),
    );

    let pairs = drain(&composer);
    assert_eq!(pairs.len(), 2);
    for (i, pair) in pairs.iter().enumerate() {
        assert!(pair.is_paired());
        assert_eq!(pair.a.id, i as u64);
        assert_eq!(pair.a.id, pair.b.as_ref().unwrap().id);
    }
    assert_eq!(pairs[0].a.name, b"p0/1");
    assert_eq!(pairs[0].b.as_ref().unwrap().name, b"p0/2");
}
