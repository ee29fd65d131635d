//! Unified error types for the nspath workspace.
//!
//! Translation deliberately exposes a small taxonomy: malformed `/proc`
//! lines are skipped during parsing and never surface here, and an
//! unreadable `/proc/mounts` degrades to an empty host table instead of
//! failing. Only contract violations and the two unrecoverable outcomes
//! below reach the caller.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum NspathError {
    /// A caller violated the API contract (non-positive pid, empty or
    /// relative path). Raised before any I/O is attempted.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violated precondition.
        message: String,
    },

    /// The target process's mount table could not be read.
    ///
    /// No translation is possible without `/proc/<pid>/mountinfo`; the
    /// process may have exited, or access may have been denied.
    #[error("cannot read mount table of pid {pid}: {source}")]
    MountTable {
        /// Process whose mount table was requested.
        pid: i32,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Translation produced no host path that exists on disk.
    #[error("no host path found for {path}")]
    NotFound {
        /// The namespace-local path that failed to translate.
        path: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NspathError>;
