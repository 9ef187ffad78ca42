//! Integration tests for the seqfeed library.
//!
//! These tests drive the whole stack (composer, source, format layer,
//! per-thread driver) over real files, the way an aligner embeds it.

mod test_formats;
mod test_quality;
mod test_sampling;
mod test_threading;
