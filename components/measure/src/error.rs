//! Error types for the measurement engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while driving measurements.
///
/// None of these are recovered locally; a failure in any trial aborts the
/// surrounding suite rather than being skipped silently.
#[derive(Error, Debug)]
pub enum MeasureError {
    /// A device control operation failed
    #[error("device operation '{op}' failed: {reason}")]
    Device {
        /// The operation that failed (e.g. `clear_log`, `install`)
        op: String,
        /// Exit status or spawn failure description
        reason: String,
    },

    /// The result signal was malformed or unparsable
    #[error("malformed result signal: {reason}")]
    Signal {
        /// What was wrong with the matched line
        reason: String,
    },

    /// The result signal did not appear before the deadline
    #[error("timed out after {waited_ms}ms waiting for '{pattern}'")]
    Timeout {
        /// The pattern that was being waited for
        pattern: String,
        /// How long the waiter polled before giving up
        waited_ms: u128,
    },

    /// A caller-supplied argument was out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The fixture file could not be swapped or restored
    #[error("fixture swap failed for {path}: {source}")]
    Fixture {
        /// The fixture file being swapped
        path: PathBuf,
        /// Underlying rename/write error
        source: io::Error,
    },

    /// Underlying I/O error
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for measurement operations
pub type MeasureResult<T> = Result<T, MeasureError>;
