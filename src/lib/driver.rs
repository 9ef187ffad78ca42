//! The per-thread driver: a pull iterator over reads and read pairs.
//!
//! Each worker owns one [`ReadPairIter`]. Its `next` refills the private
//! batch from the shared composer when needed (the only point where the
//! worker can block on the input lock), then decodes the current record
//! lock-free and hands it out. Records are emitted in id order within a
//! batch; across threads there is no ordering guarantee.

use std::sync::Arc;

use crate::batch::ReadBatch;
use crate::composer::Composer;
use crate::errors::Result;
use crate::read::Read;

/// One read, optionally with its mate.
#[derive(Debug, Clone)]
pub struct ReadPair {
    /// The read (mate 1 for pairs)
    pub a: Read,
    /// The mate-2 read, when the stream is paired
    pub b: Option<Read>,
}

impl ReadPair {
    /// True when a mate-2 read is present.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.b.is_some()
    }
}

/// Lazy, finite, non-restartable sequence of reads (or pairs) for one
/// worker thread. Dropping the iterator is the cooperative way to cancel;
/// in-flight records are simply discarded.
pub struct ReadPairIter {
    composer: Arc<Composer>,
    batch: ReadBatch,
    last_batch: bool,
    finished: bool,
}

impl ReadPairIter {
    /// Creates a driver with a batch sized from the run configuration.
    #[must_use]
    pub fn new(composer: Arc<Composer>) -> Self {
        let capacity = composer.config().max_buf;
        Self { composer, batch: ReadBatch::new(capacity), last_batch: false, finished: false }
    }

    fn next_pair(&mut self) -> Result<Option<ReadPair>> {
        loop {
            if self.finished {
                return Ok(None);
            }
            if self.batch.exhausted() {
                if self.last_batch {
                    self.finished = true;
                    return Ok(None);
                }
                self.batch.reset();
                let (done, count) = self.composer.next_batch(&mut self.batch)?;
                self.batch.init(count);
                self.last_batch = done;
                if count == 0 {
                    self.finished = true;
                    return Ok(None);
                }
            }

            let id = self.batch.current_id();
            let (ra, rb) = self.batch.current_pair_mut();
            let parsed = self.composer.parse(ra, rb, id);
            if !parsed {
                // Malformed record; the format layer has already reported it.
                self.batch.advance();
                continue;
            }

            let (a, b) = self.batch.take_current();
            self.batch.advance();
            return Ok(Some(finalize_pair(a, b, id)));
        }
    }
}

/// Stamps the pair-level flags once both mates are decoded.
fn finalize_pair(mut a: Read, mut b: Read, id: u64) -> ReadPair {
    if b.is_empty() {
        ReadPair { a, b: None }
    } else {
        a.paired = true;
        a.mate = 1;
        b.paired = true;
        b.mate = 2;
        b.id = id;
        ReadPair { a, b: Some(b) }
    }
}

impl Iterator for ReadPairIter {
    type Item = Result<ReadPair>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_pair() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
