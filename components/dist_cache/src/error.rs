//! Error types for distribution fetching, extraction and size measurement.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the distribution cache.
///
/// Every variant names the distribution identity and the stage that failed,
/// so a failed size computation can never degrade into a sentinel value in
/// a report.
#[derive(Error, Debug)]
pub enum DistError {
    /// The remote fetch failed or returned a non-success status
    #[error("fetch failed for '{identity}': {reason}")]
    Fetch {
        /// Catalog identity of the distribution
        identity: String,
        /// Transport error or HTTP status description
        reason: String,
    },

    /// The archive was corrupt or did not contain the expected layout
    #[error("extract failed for '{identity}': {reason}")]
    Extract {
        /// Catalog identity of the distribution
        identity: String,
        /// What the extraction stage observed
        reason: String,
    },

    /// `binary_size` was called before `prepare` for this distribution
    #[error("distribution '{identity}' is not prepared (missing {path})")]
    NotPrepared {
        /// Catalog identity of the distribution
        identity: String,
        /// The cache entry directory that was expected to exist
        path: PathBuf,
    },

    /// No archive member matched the spec's member glob
    #[error("no archive member matching '{pattern}' under '{identity}'")]
    ArtifactNotFound {
        /// Catalog identity of the distribution
        identity: String,
        /// The glob pattern that matched nothing
        pattern: String,
    },

    /// No strip tool was found under the configured toolchain root
    #[error("no strip tool for abi '{abi}' under toolchain root {root}")]
    ToolchainNotFound {
        /// ABI the lookup was keyed by
        abi: String,
        /// The toolchain root that was searched
        root: PathBuf,
    },

    /// The toolchain root configuration is absent
    #[error("toolchain root is not configured (set NDK_PATH)")]
    MissingConfig,

    /// The strip transform ran but failed
    #[error("strip failed for '{identity}' ({tool}): {reason}")]
    Transform {
        /// Catalog identity of the distribution
        identity: String,
        /// Strip tool that was invoked
        tool: String,
        /// Exit status or spawn error
        reason: String,
    },

    /// Underlying filesystem error
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for distribution cache operations
pub type DistResult<T> = Result<T, DistError>;
