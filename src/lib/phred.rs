//! Quality-score decoding to the ASCII phred+33 scale.
//!
//! Every input quality representation (phred+33 chars, phred+64 chars,
//! solexa+64 chars, space-separated integers) is converted to phred+33 ASCII
//! at parse time, so downstream code only ever sees one scale. Values are
//! clamped to the SAM-compatible maximum of Q93.

use bstr::ByteSlice;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum phred score carried through the engine (Q93)
pub const MAX_PHRED: u8 = 93;

/// ASCII offset of the phred+33 scale
pub const PHRED33_OFFSET: u8 = b'!';

/// Quality char used for formats that carry no qualities (Q40)
pub const SYNTHETIC_QUAL: u8 = b'I';

/// Input scale for character-encoded qualities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityEncoding {
    /// ASCII offset 33, phred-scaled (the output scale)
    Phred33,
    /// ASCII offset 64, phred-scaled
    Phred64,
    /// ASCII offset 64, solexa-scaled (may encode negative values)
    Solexa64,
}

/// Converts a solexa quality to the nearest phred quality.
///
/// Solexa scores are log-odds rather than log-probabilities; the mapping is
/// `phred = 10 * log10(10^(solexa/10) + 1)`. The two scales converge above
/// roughly Q10.
#[must_use]
pub fn solexa_to_phred(solexa: i32) -> i32 {
    (10.0 * (10f64.powf(f64::from(solexa) / 10.0) + 1.0).log10()).round() as i32
}

/// Decodes one quality character to a phred value.
///
/// Returns `None` when the character is below the valid range for the scale,
/// which indicates the file uses a different encoding than configured.
/// Values above [`MAX_PHRED`] are clamped.
#[must_use]
pub fn char_to_phred(c: u8, encoding: QualityEncoding) -> Option<u8> {
    let value = match encoding {
        QualityEncoding::Phred33 => i32::from(c) - 33,
        QualityEncoding::Phred64 => i32::from(c) - 64,
        QualityEncoding::Solexa64 => solexa_to_phred(i32::from(c) - 64),
    };
    if value < 0 { None } else { Some(value.min(i32::from(MAX_PHRED)) as u8) }
}

/// Appends the phred+33 rendering of each quality char in `src` to `out`.
///
/// Returns false (leaving `out` in an unspecified state) if any char is
/// invalid for the configured scale.
pub(crate) fn decode_char_quals(out: &mut Vec<u8>, src: &[u8], encoding: QualityEncoding) -> bool {
    for &c in src {
        match char_to_phred(c, encoding) {
            Some(q) => out.push(q + PHRED33_OFFSET),
            None => return false,
        }
    }
    true
}

/// Appends phred+33 chars decoded from space-separated integer qualities.
///
/// Integers are interpreted on the configured scale (solexa integers are
/// remapped). Returns false on a malformed token or a value that would be
/// negative on the phred scale.
pub(crate) fn decode_int_quals(out: &mut Vec<u8>, src: &[u8], encoding: QualityEncoding) -> bool {
    for token in src.split(|&b| b == b' ' || b == b'\t') {
        if token.is_empty() {
            continue;
        }
        let Ok(text) = std::str::from_utf8(token) else {
            return false;
        };
        let Ok(value) = text.parse::<i32>() else {
            return false;
        };
        let phred = match encoding {
            QualityEncoding::Solexa64 => solexa_to_phred(value),
            _ => value,
        };
        if phred < 0 {
            return false;
        }
        out.push(phred.min(i32::from(MAX_PHRED)) as u8 + PHRED33_OFFSET);
    }
    true
}

/// Once-per-source latches for quality-domain diagnostics.
///
/// Malformed qualities tend to repeat for every record in a file, so each
/// diagnostic fires at most once per source and similar records are skipped
/// silently afterwards.
#[derive(Debug, Default)]
pub struct QualWarnings {
    wrong_format_seen: AtomicBool,
    too_few_seen: AtomicBool,
    too_many_seen: AtomicBool,
}

impl QualWarnings {
    /// A quality char or integer was outside the configured scale.
    pub fn wrong_format(&self, name: &[u8]) {
        if !self.wrong_format_seen.swap(true, Ordering::Relaxed) {
            log::error!(
                "Quality value for read '{}' is outside the range of the configured scale; \
                 skipping records with malformed qualities",
                name.as_bstr()
            );
        }
    }

    /// Fewer quality values than sequence bases.
    pub fn too_few(&self, name: &[u8]) {
        if !self.too_few_seen.swap(true, Ordering::Relaxed) {
            log::error!(
                "Too few quality values for read '{}'; skipping records with malformed qualities",
                name.as_bstr()
            );
        }
    }

    /// More quality values than sequence bases.
    pub fn too_many(&self, name: &[u8]) {
        if !self.too_many_seen.swap(true, Ordering::Relaxed) {
            log::error!(
                "Too many quality values for read '{}'; skipping records with malformed qualities",
                name.as_bstr()
            );
        }
    }
}
