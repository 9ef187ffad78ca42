//! FASTA record grammar.
//!
//! A record is a `>name` header line followed by sequence lines up to the
//! next `>` at start of line, or end of file. Blank lines inside a record are
//! tolerated. FASTA carries no qualities; decoded reads get a synthetic Q40
//! string.

use std::io;

use super::{FileCtx, ParseCtx, fix_mate_name, hard_clip, trim_eol};
use crate::batch::{Mate, ReadBatch};
use crate::phred::SYNTHETIC_QUAL;
use crate::read::Read;

pub(crate) fn light_parse_batch(
    file: &mut FileCtx<'_>,
    batch: &mut ReadBatch,
    mate: Mate,
    start: usize,
) -> io::Result<(bool, usize)> {
    let mut readi = start;
    let cap = batch.capacity();
    while readi < cap {
        let read = batch.slot_mut(mate, readi);
        read.reset();

        // Find the '>' that opens the next record.
        let first = loop {
            match file.stream.get()? {
                None => return Ok((true, readi - start)),
                Some(c) if c.is_ascii_whitespace() => {}
                Some(c) => break c,
            }
        };
        if first != b'>' {
            file.flag("content before the first '>' record marker");
            loop {
                match file.stream.get()? {
                    None => return Ok((true, readi - start)),
                    Some(b'>') => break,
                    Some(_) => {}
                }
            }
        }
        read.raw.push(b'>');

        // Copy the record body up to the next record marker.
        let mut at_line_start = false;
        loop {
            match file.stream.get()? {
                None => {
                    readi += 1;
                    return Ok((true, readi - start));
                }
                Some(b'>') if at_line_start => {
                    file.stream.unget(b'>');
                    readi += 1;
                    break;
                }
                Some(byte) => {
                    at_line_start = byte == b'\n';
                    read.raw.push(byte);
                }
            }
        }
    }
    Ok((false, readi - start))
}

pub(crate) fn parse_one(read: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    let raw = std::mem::take(&mut read.raw);
    if raw.first() != Some(&b'>') {
        read.reset();
        return false;
    }
    let header_end = raw.iter().position(|&b| b == b'\n').unwrap_or(raw.len());
    read.name.extend_from_slice(trim_eol(&raw[1..header_end]));
    for &byte in &raw[header_end..] {
        if byte.is_ascii_alphabetic() {
            read.seq.push(byte);
        }
    }
    hard_clip(read, ctx.config.trim5, ctx.config.trim3);
    read.qual.resize(read.seq.len(), SYNTHETIC_QUAL);
    if ctx.config.fix_name {
        fix_mate_name(&mut read.name);
    }
    read.id = id;
    read.raw = raw;
    true
}
