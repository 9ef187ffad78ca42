//! Input validation utilities
//!
//! Validation runs in the composer factory, before any file is opened, so a
//! bad path fails the whole run with a structured error instead of surfacing
//! mid-stream from a worker thread.

use crate::errors::{Result, SeqfeedError};
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "mate-1 input")
///
/// # Errors
/// Returns an error if the file does not exist
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(SeqfeedError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "file does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that every file in a list exists
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[P], description: &str) -> Result<()> {
    for file in files {
        validate_file_exists(file, description)?;
    }
    Ok(())
}
