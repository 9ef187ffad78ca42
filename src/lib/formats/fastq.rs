//! FASTQ record grammar, plain and interleaved.
//!
//! A record is four lines: `@name`, sequence, `+` (optionally repeating the
//! name), and quality. The quality line must be exactly as long as the
//! sequence line; the check runs during light-parse where both lengths fall
//! out of the byte copy for free. In interleaved mode, consecutive records
//! alternate mate-1/mate-2 and land in the two halves of the batch at
//! matching indices within a single light-parse call.

use std::io;

use super::{FileCtx, ParseCtx, Rec, append_line, decode_quals_checked, fix_mate_name, hard_clip, trim_eol};
use crate::batch::{Mate, ReadBatch};
use crate::read::Read;

pub(crate) fn light_parse_batch(
    file: &mut FileCtx<'_>,
    batch: &mut ReadBatch,
    mate: Mate,
    start: usize,
    interleaved: bool,
) -> io::Result<(bool, usize)> {
    let mut readi = start;
    let cap = batch.capacity();
    while readi < cap {
        if interleaved {
            match light_parse_record(file, batch.slot_mut(Mate::A, readi))? {
                Rec::Ok => {}
                Rec::Skip => continue,
                Rec::Eof => return Ok((true, readi - start)),
            }
            match light_parse_record(file, batch.slot_mut(Mate::B, readi))? {
                Rec::Ok => readi += 1,
                Rec::Skip => batch.slot_mut(Mate::A, readi).reset(),
                Rec::Eof => {
                    file.flag("interleaved file ended with an unpaired mate-1 record");
                    batch.slot_mut(Mate::A, readi).reset();
                    return Ok((true, readi - start));
                }
            }
        } else {
            match light_parse_record(file, batch.slot_mut(mate, readi))? {
                Rec::Ok => readi += 1,
                Rec::Skip => {}
                Rec::Eof => return Ok((true, readi - start)),
            }
        }
    }
    Ok((false, readi - start))
}

/// Copies one four-line record into `read.raw`, validating only line count
/// and the sequence/quality length equality.
fn light_parse_record(file: &mut FileCtx<'_>, read: &mut Read) -> io::Result<Rec> {
    read.reset();

    // Tolerate blank lines between records.
    let first = loop {
        match file.stream.get()? {
            None => return Ok(Rec::Eof),
            Some(b'\n' | b'\r') => {}
            Some(c) => break c,
        }
    };
    if first != b'@' {
        file.flag("record does not begin with '@'");
        loop {
            match file.stream.get()? {
                None => return Ok(Rec::Eof),
                Some(b'\n') => break,
                Some(_) => {}
            }
        }
        return Ok(Rec::Skip);
    }

    read.raw.push(b'@');
    let name = append_line(file.stream, &mut read.raw)?;
    if name.eof {
        file.flag("record truncated at end of file");
        read.reset();
        return Ok(Rec::Eof);
    }
    let seq = append_line(file.stream, &mut read.raw)?;
    if seq.eof {
        file.flag("record truncated at end of file");
        read.reset();
        return Ok(Rec::Eof);
    }
    let plus = append_line(file.stream, &mut read.raw)?;
    if plus.eof {
        file.flag("record truncated at end of file");
        read.reset();
        return Ok(Rec::Eof);
    }
    let qual = append_line(file.stream, &mut read.raw)?;
    if qual.eof && qual.len == 0 {
        file.flag("record truncated at end of file");
        read.reset();
        return Ok(Rec::Eof);
    }
    if qual.len != seq.len {
        file.flag("sequence and quality lengths differ");
        read.reset();
        return Ok(if qual.eof { Rec::Eof } else { Rec::Skip });
    }
    Ok(Rec::Ok)
}

pub(crate) fn parse_one(read: &mut Read, id: u64, ctx: &ParseCtx<'_>) -> bool {
    let raw = std::mem::take(&mut read.raw);
    let mut lines = raw.split(|&b| b == b'\n');
    let (Some(header), Some(seq_line), Some(_plus), Some(qual_line)) =
        (lines.next(), lines.next(), lines.next(), lines.next())
    else {
        read.reset();
        return false;
    };
    if header.first() != Some(&b'@') {
        read.reset();
        return false;
    }
    read.name.extend_from_slice(trim_eol(&header[1..]));
    read.seq.extend_from_slice(trim_eol(seq_line));
    if !decode_quals_checked(read, trim_eol(qual_line), ctx) {
        read.reset();
        return false;
    }
    hard_clip(read, ctx.config.trim5, ctx.config.trim3);
    if ctx.config.fix_name {
        fix_mate_name(&mut read.name);
    }
    read.id = id;
    read.raw = raw;
    true
}
