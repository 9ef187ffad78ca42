//! The windowed sliding-sample mode over long FASTA sequences.

use crate::helpers::*;
use seqfeed_lib::config::{InputFormat, SourceConfig};
use tempfile::TempDir;

fn sampling_config(sample_len: usize, sample_freq: usize) -> SourceConfig {
    SourceConfig { sample_len, sample_freq, ..config(InputFormat::FastaContinuous) }
}

#[test]
fn test_windows_sampled_every_stride() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fa", ">s1\nACGTACGT\n");
    let composer = singles_composer(vec![file], sampling_config(3, 2));

    let pairs = drain(&composer);
    let summary: Vec<(Vec<u8>, Vec<u8>, u64)> =
        pairs.iter().map(|p| (p.a.name.clone(), p.a.seq.clone(), p.a.id)).collect();
    assert_eq!(
        summary,
        vec![
            (b"s1_0".to_vec(), b"ACG".to_vec(), 0),
            (b"s1_2".to_vec(), b"GTA".to_vec(), 1),
            (b"s1_4".to_vec(), b"ACG".to_vec(), 2),
            (b"s1_5".to_vec(), b"CGT".to_vec(), 3),
        ]
    );
    for pair in &pairs {
        assert_eq!(pair.a.qual, b"III");
        assert!(!pair.is_paired());
    }
}

#[test]
fn test_window_equals_sequence_slice() {
    let sequence = b"ACGTTGCAACGTTGCA";
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "in.fa",
        &format!(">s\n{}\n", std::str::from_utf8(sequence).unwrap()),
    );
    let composer = singles_composer(vec![file], sampling_config(5, 3));

    for pair in drain(&composer) {
        let name = String::from_utf8(pair.a.name.clone()).unwrap();
        let offset: usize = name.rsplit('_').next().unwrap().parse().unwrap();
        assert_eq!(pair.a.seq, &sequence[offset..offset + 5]);
    }
}

#[test]
fn test_ambiguous_windows_skipped() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fa", ">s\nACGTNACGTT\n");
    let composer = singles_composer(vec![file], sampling_config(3, 1));

    let names: Vec<Vec<u8>> = drain(&composer).iter().map(|p| p.a.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            b"s_0".to_vec(),
            b"s_1".to_vec(),
            b"s_5".to_vec(),
            b"s_6".to_vec(),
            b"s_7".to_vec(),
        ]
    );
}

#[test]
fn test_multiple_sequences_restart_offsets() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "in.fa", ">chr1 assembled\nACGTAC\n>chr2\nTTTTT\n");
    let composer = singles_composer(vec![file], sampling_config(4, 2));

    let names: Vec<Vec<u8>> = drain(&composer).iter().map(|p| p.a.name.clone()).collect();
    assert_eq!(
        names,
        vec![b"chr1_0".to_vec(), b"chr1_2".to_vec(), b"chr2_0".to_vec(), b"chr2_1".to_vec()]
    );
}

#[test]
fn test_tiny_batches_do_not_change_the_sample() {
    let dir = TempDir::new().unwrap();
    let contents = ">s\nACGTACGTACGTACGT\n";
    let big = write_file(&dir, "big.fa", contents);
    let small = write_file(&dir, "small.fa", contents);

    let reference = drain(&singles_composer(vec![big], sampling_config(4, 3)));
    let tiny_batches = drain(&singles_composer(
        vec![small],
        SourceConfig { max_buf: 1, ..sampling_config(4, 3) },
    ));

    assert_eq!(reference.len(), tiny_batches.len());
    for (x, y) in reference.iter().zip(tiny_batches.iter()) {
        assert_eq!(x.a.name, y.a.name);
        assert_eq!(x.a.seq, y.a.seq);
    }
}
