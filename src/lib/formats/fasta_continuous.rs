//! Fixed-length windows sampled from long FASTA sequences.
//!
//! Instead of one read per record, this grammar slides a window of length
//! `L` along each sequence and emits the window every `F` bases. A ring
//! buffer of size `L` holds the most recent bases; a remaining-to-eat
//! counter (initialised to `L-1`) tracks how many more bases must arrive
//! before the window is full and clean. An ambiguous base resets the counter,
//! so no emitted window ever contains one. When a sequence ends, its final
//! full window is emitted even when it falls off-stride, so the tail of the
//! sequence is always covered.
//!
//! Emitted reads are named `<sequence name>_<offset>`, where `offset` is the
//! window's start within the sequence; the window equals the sequence slice
//! `[offset, offset + L)`. Light-parse stores the synthesized `name\twindow`
//! layout in the raw buffer and decoding is shared with the raw format.

use std::io;

use super::{FileCtx, push_decimal};
use crate::batch::{Mate, ReadBatch};
use crate::read::Read;

/// Per-file sliding-window state.
#[derive(Debug)]
pub(crate) struct WindowState {
    length: usize,
    freq: u64,
    ring: Vec<u8>,
    ring_cur: usize,
    /// Bases still to consume before the window is full and clean
    eat: usize,
    /// Bases of the current sequence consumed so far
    pos: u64,
    /// Start offset of the most recently emitted window
    last_emitted: Option<u64>,
    /// Name of the current sequence, up to its first whitespace
    prefix: Vec<u8>,
}

impl WindowState {
    pub(crate) fn new(length: usize, freq: usize) -> Self {
        Self {
            length,
            freq: freq as u64,
            ring: vec![0; length],
            ring_cur: 0,
            eat: length.saturating_sub(1),
            pos: 0,
            last_emitted: None,
            prefix: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.ring_cur = 0;
        self.eat = self.length.saturating_sub(1);
        self.pos = 0;
        self.last_emitted = None;
        self.prefix.clear();
    }

    /// Start offset of the current window, when it is full and clean.
    fn full_window_start(&self) -> Option<u64> {
        if self.eat == 0 && self.pos >= self.length as u64 {
            Some(self.pos - self.length as u64)
        } else {
            None
        }
    }

    /// The end-of-sequence window still owed to the stream, if any.
    fn pending_flush(&self) -> Option<u64> {
        match self.full_window_start() {
            Some(start) if self.last_emitted != Some(start) => Some(start),
            _ => None,
        }
    }

    /// Writes the current window into a slot as `prefix_offset\twindow`.
    fn emit(&self, read: &mut Read, start: u64) {
        read.reset();
        read.raw.extend_from_slice(&self.prefix);
        read.raw.push(b'_');
        push_decimal(&mut read.raw, start);
        read.raw.push(b'\t');
        for i in 0..self.length {
            read.raw.push(self.ring[(self.ring_cur + i) % self.length]);
        }
    }

    pub(crate) fn light_parse_batch(
        &mut self,
        file: &mut FileCtx<'_>,
        batch: &mut ReadBatch,
        mate: Mate,
        start_index: usize,
    ) -> io::Result<(bool, usize)> {
        let mut readi = start_index;
        let cap = batch.capacity();
        while readi < cap {
            let Some(c) = file.stream.get()? else {
                if let Some(start) = self.pending_flush() {
                    self.emit(batch.slot_mut(mate, readi), start);
                    self.last_emitted = Some(start);
                    readi += 1;
                }
                return Ok((true, readi - start_index));
            };
            match c {
                b'>' => {
                    if let Some(start) = self.pending_flush() {
                        self.emit(batch.slot_mut(mate, readi), start);
                        self.last_emitted = Some(start);
                        readi += 1;
                    }
                    self.start_sequence(file)?;
                }
                base if matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T') => {
                    self.ring[self.ring_cur] = base.to_ascii_uppercase();
                    self.ring_cur = (self.ring_cur + 1) % self.length;
                    self.pos += 1;
                    if self.eat > 0 {
                        self.eat -= 1;
                        continue;
                    }
                    let start = self.pos - self.length as u64;
                    if start % self.freq == 0 {
                        self.emit(batch.slot_mut(mate, readi), start);
                        self.last_emitted = Some(start);
                        readi += 1;
                    }
                }
                base if base.is_ascii_alphabetic() => {
                    // Ambiguous base: every window containing it is skipped.
                    self.pos += 1;
                    self.eat = self.length.saturating_sub(1);
                }
                _ => {}
            }
        }
        Ok((false, readi - start_index))
    }

    /// Consumes a `>` header line, resetting the window for the new sequence.
    fn start_sequence(&mut self, file: &mut FileCtx<'_>) -> io::Result<()> {
        self.reset();
        let mut saw_space = false;
        loop {
            match file.stream.get()? {
                None | Some(b'\n') => return Ok(()),
                Some(b'\r') => {}
                Some(c) => {
                    if saw_space {
                        continue;
                    }
                    if c.is_ascii_whitespace() {
                        saw_space = true;
                    } else {
                        self.prefix.push(c);
                    }
                }
            }
        }
    }
}
