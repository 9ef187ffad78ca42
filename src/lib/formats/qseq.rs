//! Illumina Qseq record grammar.
//!
//! Eleven tab-separated fields per line: machine, run, lane, tile, x, y,
//! index, read number, sequence, quality, chastity filter. The read name is
//! synthesized from the location fields; `.` in the sequence is the Qseq
//! spelling of an unknown base and is read as `N`. Records failing the
//! chastity filter (final field `0`) are retained but tagged, and their ids
//! advance like any other read.

use std::io;

use super::{FileCtx, ParseCtx, append_line, decode_quals_checked, hard_clip, trim_eol};
use crate::batch::{Mate, ReadBatch};
use crate::read::Read;

/// Tab count of a well-formed eleven-field line.
const QSEQ_TABS: usize = 10;

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
        let line = append_line(file.stream, &mut read.raw)?;
        if line.len == 0 {
            read.reset();
            if line.eof {
                return Ok((true, readi - start));
            }
            continue;
        }
        let tabs = read.raw.iter().filter(|&&b| b == b'\t').count();
        if tabs != QSEQ_TABS {
            file.flag("line does not have eleven tab-separated fields");
            read.reset();
            if line.eof {
                return Ok((true, readi - start));
            }
            continue;
        }
        readi += 1;
        if line.eof {
            return Ok((true, readi - start));
        }
    }
    Ok((false, readi - start))
}

pub(crate) fn parse_one(read: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    let raw = std::mem::take(&mut read.raw);
    let line = trim_eol(&raw);
    let fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();
    if fields.len() != 11 {
        read.reset();
        return false;
    }

    // machine_run:lane:tile:x:y#index/readno
    read.name.extend_from_slice(fields[0]);
    read.name.push(b'_');
    read.name.extend_from_slice(fields[1]);
    for &(sep, field) in
        &[(b':', fields[2]), (b':', fields[3]), (b':', fields[4]), (b':', fields[5])]
    {
        read.name.push(sep);
        read.name.extend_from_slice(field);
    }
    read.name.push(b'#');
    read.name.extend_from_slice(fields[6]);
    read.name.push(b'/');
    read.name.extend_from_slice(fields[7]);

    for &byte in fields[8] {
        read.seq.push(if byte == b'.' { b'N' } else { byte });
    }
    if !decode_quals_checked(read, fields[9], ctx) {
        read.reset();
        return false;
    }
    hard_clip(read, ctx.config.trim5, ctx.config.trim3);
    read.filter_passed = fields[10] != &b"0"[..];
    read.id = id;
    read.raw = raw;
    true
}
