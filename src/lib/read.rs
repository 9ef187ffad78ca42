//! The in-memory representation of one sequencing read.

use crate::phred::PHRED33_OFFSET;
use bstr::{BStr, ByteSlice};

/// One read record.
///
/// `raw` holds the bytes of the record exactly as light-parsed under the
/// input lock (for name-less formats a small synthesized `name\tseq` layout
/// instead). The structured fields are only valid after the record has been
/// decoded outside the lock; until then they are empty.
///
/// After decoding, `seq.len() == qual.len()` always holds: formats without
/// qualities get a synthetic Q40 string of matching length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    /// Raw record bytes captured during light-parse
    pub raw: Vec<u8>,
    /// Read name (parsed or synthesized, depending on format)
    pub name: Vec<u8>,
    /// Nucleotide sequence; IUPAC ambiguity codes are preserved
    pub seq: Vec<u8>,
    /// Per-base qualities as ASCII phred+33
    pub qual: Vec<u8>,
    /// Globally unique, monotonically increasing read id
    pub id: u64,
    /// 0 for unpaired reads, 1 or 2 for the mates of a pair
    pub mate: u8,
    /// Whether this read is half of a pair
    pub paired: bool,
    /// Bases actually clipped from the 5' end
    pub trimmed5: usize,
    /// Bases actually clipped from the 3' end
    pub trimmed3: usize,
    /// Qseq chastity filter; true for every other format
    pub filter_passed: bool,
}

impl Default for Read {
    fn default() -> Self {
        Self {
            raw: Vec::new(),
            name: Vec::new(),
            seq: Vec::new(),
            qual: Vec::new(),
            id: 0,
            mate: 0,
            paired: false,
            trimmed5: 0,
            trimmed3: 0,
            filter_passed: true,
        }
    }
}

impl Read {
    /// Creates an empty read.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been light-parsed into this slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.name.is_empty() && self.seq.is_empty()
    }

    /// Returns the record to the empty state, keeping buffer capacity.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.name.clear();
        self.seq.clear();
        self.qual.clear();
        self.id = 0;
        self.mate = 0;
        self.paired = false;
        self.trimmed5 = 0;
        self.trimmed3 = 0;
        self.filter_passed = true;
    }

    /// Read name as a displayable byte string.
    #[must_use]
    pub fn name_bstr(&self) -> &BStr {
        self.name.as_bstr()
    }

    /// Numeric phred scores decoded from the ASCII quality string.
    pub fn phred_scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.qual.iter().map(|&c| c.saturating_sub(PHRED33_OFFSET))
    }

    /// Length of the (possibly clipped) sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
}
