//! Tab-separated record grammar.
//!
//! One line per record (or pair). Field count governs interpretation:
//!
//! - 3 fields: `name seq qual` (unpaired)
//! - 5 fields: `name seq1 qual1 seq2 qual2` (pair sharing one name)
//! - 6 fields: `name name2 seq1 qual1 seq2 qual2` (pair, second-name layout)
//!
//! Whether a paired line carries five or six fields is fixed by the
//! configured variant; a line with any other count is skipped and the file
//! flagged.

use std::io;

use super::{FileCtx, ParseCtx, append_line, decode_quals_checked, fix_mate_name, hard_clip, trim_eol};
use crate::batch::{Mate, ReadBatch};
use crate::config::InputFormat;
use crate::read::Read;

pub(crate) fn light_parse_batch(
    file: &mut FileCtx<'_>,
    batch: &mut ReadBatch,
    mate: Mate,
    start: usize,
    second_name: bool,
) -> io::Result<(bool, usize)> {
    let pair_tabs = if second_name { 5 } else { 4 };
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
        if tabs != 2 && tabs != pair_tabs {
            file.flag("unexpected number of tab-separated fields");
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

/// Decodes a tabbed line into one read or a pair. The whole line lives in
/// `ra.raw`; for paired lines the mate-2 fields are decoded into `rb`.
pub(crate) fn parse(ra: &mut Read, rb: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    let raw = std::mem::take(&mut ra.raw);
    let line = trim_eol(&raw);
    let fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();
    let second_name = ctx.config.format == InputFormat::Tabbed6;

    let ok = match (fields.len(), second_name) {
        (3, _) => {
            rb.reset();
            fill_one(ra, fields[0], fields[1], fields[2], id, ctx)
        }
        (5, false) => {
            fill_one(ra, fields[0], fields[1], fields[2], id, ctx)
                && fill_one(rb, fields[0], fields[3], fields[4], id, ctx)
        }
        (6, true) => {
            fill_one(ra, fields[0], fields[2], fields[3], id, ctx)
                && fill_one(rb, fields[1], fields[4], fields[5], id, ctx)
        }
        _ => false,
    };
    if !ok {
        ra.reset();
        rb.reset();
        return false;
    }
    ra.raw = raw;
    true
}

fn fill_one(
    read: &mut Read,
    name: &[u8],
    seq: &[u8],
    qual: &[u8],
    id: u64,
    ctx: &ParseCtx<'_>,
) -> bool {
    read.name.clear();
    read.seq.clear();
    read.name.extend_from_slice(name);
    read.seq.extend_from_slice(seq);
    if !decode_quals_checked(read, qual, ctx) {
        return false;
    }
    hard_clip(read, ctx.config.trim5, ctx.config.trim3);
    if ctx.config.fix_name {
        fix_mate_name(&mut read.name);
    }
    read.id = id;
    true
}
