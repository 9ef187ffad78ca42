//! Custom error types for seqfeed operations.

use thiserror::Error;

/// Result type alias for seqfeed operations
pub type Result<T> = std::result::Result<T, SeqfeedError>;

/// Error type for seqfeed operations
#[derive(Error, Debug)]
pub enum SeqfeedError {
    /// A read file could not be opened
    #[error("Could not open read file '{path}': {source}")]
    Open {
        /// Path to the file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// An unrecoverable I/O failure while streaming a read file, including
    /// gzip corruption
    #[error("Error while reading '{path}': {source}")]
    Io {
        /// Path to the file being read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Paired mate files went out of sync
    #[error(
        "Paired inputs out of sync: {count_a} mate-1 record(s) (ended: {done_a}) \
         vs {count_b} mate-2 record(s) (ended: {done_b})"
    )]
    PairMismatch {
        /// Records light-parsed from the mate-1 side this batch
        count_a: usize,
        /// Whether the mate-1 side reported end of stream
        done_a: bool,
        /// Records light-parsed from the mate-2 side this batch
        count_b: usize,
        /// Whether the mate-2 side reported end of stream
        done_b: bool,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File validation error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "FASTQ", "mate-1 input")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}
