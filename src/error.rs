//! Error types for `namefind`

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{MAX_DEPTH, MAX_PATH_LENGTH, MAX_TARGETS};

/// Custom result type for `namefind` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `namefind`
///
/// # Scope
/// - Configuration errors stop the run before any worker starts
/// - Every other error is confined to one subtree, entry or target
#[derive(Debug, Error)]
pub enum Error {
    /// No target filename was given
    #[error("no filename to search for")]
    NoTargets,

    /// More target filenames than workers allowed
    #[error("too many filenames: {count} given, at most {} allowed", MAX_TARGETS)]
    TooManyTargets {
        /// Number of filenames given
        count: usize,
    },

    /// A target filename was the empty string
    #[error("filename to search for must not be empty")]
    EmptyTarget,

    /// Directory could not be opened for listing
    #[error("cannot open directory '{}': {source}", path.display())]
    OpenDir {
        /// Directory that failed to open
        path:   PathBuf,
        /// Underlying cause
        source: io::Error,
    },

    /// Listing failed part way through a directory
    #[error("cannot read entries of '{}': {source}", path.display())]
    ReadEntry {
        /// Directory being listed
        path:   PathBuf,
        /// Underlying cause
        source: io::Error,
    },

    /// Entry metadata could not be read
    #[error("cannot stat '{}': {source}", path.display())]
    Metadata {
        /// Entry that could not be classified
        path:   PathBuf,
        /// Underlying cause
        source: io::Error,
    },

    /// Matching file could not be resolved to an absolute path
    #[error("cannot resolve '{}': {source}", path.display())]
    Resolve {
        /// Entry that could not be resolved
        path:   PathBuf,
        /// Underlying cause
        source: io::Error,
    },

    /// Composed path would not fit the platform limit
    #[error(
        "skipping '{}': path length {len} reaches the {} byte limit",
        path.display(),
        MAX_PATH_LENGTH
    )]
    PathTooLong {
        /// Composed path that was not used
        path: PathBuf,
        /// Length of the composed path in bytes
        len:  usize,
    },

    /// Directory nesting exceeded the walk's limit
    #[error("skipping '{}': more than {} nested directories", path.display(), MAX_DEPTH)]
    DepthExceeded {
        /// Directory that was not entered
        path: PathBuf,
    },

    /// Match line could not be written
    #[error("cannot write match for '{}': {source}", path.display())]
    Report {
        /// Path of the match that was lost
        path:   PathBuf,
        /// Underlying cause
        source: io::Error,
    },

    /// Worker thread could not be started
    #[error("cannot start worker: {source}")]
    Launch {
        /// Underlying cause
        source: io::Error,
    },

    /// Worker thread panicked before finishing its walk
    #[error("worker stopped unexpectedly: {message}")]
    WorkerPanicked {
        /// Panic payload, when it was a string
        message: String,
    },
}

impl Error {
    /// Whether the run may continue past this error
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NoTargets | Self::TooManyTargets { .. } | Self::EmptyTarget)
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> String {
        let tip = match self {
            Self::NoTargets | Self::EmptyTarget => {
                "Usage: namefind [-R] [-i] <root> <filename>..."
            },
            Self::TooManyTargets { .. } => "Tip: Split the filenames over several runs",
            Self::OpenDir { .. } | Self::ReadEntry { .. } | Self::Metadata { .. } => {
                "Tip: Check directory permissions and try again"
            },
            Self::Resolve { .. } => {
                "Tip: The file may have been moved or deleted during the search"
            },
            Self::PathTooLong { .. } | Self::DepthExceeded { .. } => {
                "Tip: Start the search closer to the files you are looking for"
            },
            Self::Report { .. } => "Tip: Check that standard output is still open",
            Self::Launch { .. } => "Tip: Search for fewer filenames at once",
            Self::WorkerPanicked { .. } => "Tip: This is a bug, please report it",
        };
        format!("Error: {self}\n{tip}")
    }
}
