//! Raw record grammar: one bare nucleotide sequence per line.
//!
//! The format carries neither names nor qualities. Each record is named by
//! its ordinal within the file (restarting at zero on file rotation) and the
//! light-parse stores the synthesized `ordinal\tseq` layout in the raw
//! buffer. Qualities are synthetic Q40.

use std::io;

use super::{FileCtx, append_line, push_decimal};
use crate::batch::{Mate, ReadBatch};

pub(crate) fn light_parse_batch(
    file: &mut FileCtx<'_>,
    batch: &mut ReadBatch,
    mate: Mate,
    start: usize,
    ordinal: &mut u64,
) -> io::Result<(bool, usize)> {
    let mut readi = start;
    let cap = batch.capacity();
    while readi < cap {
        let read = batch.slot_mut(mate, readi);
        read.reset();
        push_decimal(&mut read.raw, *ordinal);
        read.raw.push(b'\t');
        let line = append_line(file.stream, &mut read.raw)?;
        if line.len == 0 {
            read.reset();
            if line.eof {
                return Ok((true, readi - start));
            }
            continue;
        }
        *ordinal += 1;
        readi += 1;
        if line.eof {
            return Ok((true, readi - start));
        }
    }
    Ok((false, readi - start))
}
