//! Common types and constants for `namefind`

use std::fmt;
use std::path::{Path, PathBuf};

use arrayvec::ArrayVec;

use crate::error::{Error, Result};

/// Maximum number of target filenames per search
pub const MAX_TARGETS: usize = 20;

/// Maximum length of a composed path in bytes, terminator included (`PATH_MAX`)
pub const MAX_PATH_LENGTH: usize = 4_096;

/// Maximum directory nesting below the root in a single walk
pub const MAX_DEPTH: usize = 2_048;

/// A validated search: where to look, what to look for and how
///
/// Built once, then shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    root:             PathBuf,
    targets:          ArrayVec<String, MAX_TARGETS>,
    recursive:        bool,
    case_insensitive: bool,
}

impl SearchRequest {
    /// Create a new search request
    ///
    /// # Errors
    /// Returns error if:
    /// - No target filename is given
    /// - More than `MAX_TARGETS` target filenames are given
    /// - A target filename is empty
    pub fn new<I, T>(
        root: impl Into<PathBuf>,
        targets: I,
        recursive: bool,
        case_insensitive: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut collected = ArrayVec::new();
        let mut count = 0_usize;

        for target in targets {
            let target = target.into();
            if target.is_empty() {
                return Err(Error::EmptyTarget);
            }
            count += 1;
            // Keep counting past the limit so the error reports the real number
            let _ = collected.try_push(target);
        }

        if count == 0 {
            return Err(Error::NoTargets);
        }
        if count > MAX_TARGETS {
            return Err(Error::TooManyTargets { count });
        }

        Ok(Self { root: root.into(), targets: collected, recursive, case_insensitive })
    }

    /// Directory the search starts from
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target filenames in the order they were given
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Whether subdirectories are searched
    #[must_use]
    pub const fn recursive(&self) -> bool {
        self.recursive
    }

    /// Whether names are compared ignoring ASCII case
    #[must_use]
    pub const fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Per-worker view of this request for one target
    #[must_use]
    pub const fn context<'a>(&self, target: &'a str) -> WalkContext<'a> {
        WalkContext {
            target,
            recursive: self.recursive,
            case_insensitive: self.case_insensitive,
        }
    }
}

/// What a single worker walks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkContext<'a> {
    /// Filename this worker searches for
    pub target:           &'a str,
    /// Descend into subdirectories
    pub recursive:        bool,
    /// Compare names ignoring ASCII case
    pub case_insensitive: bool,
}

/// Opaque worker identity, unique within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(usize);

impl WorkerId {
    /// Identity of the worker launched at `index` (zero-based)
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index + 1)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A regular file whose name matched a worker's target
#[derive(Debug, Clone, Copy)]
pub struct MatchEvent<'a> {
    /// Worker that found the file
    pub worker: WorkerId,
    /// Target the file matched
    pub target: &'a str,
    /// Canonical absolute path of the file
    pub path:   &'a Path,
}

/// Counters collected by one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories opened
    pub dirs:    usize,
    /// Regular files examined
    pub files:   usize,
    /// Matches reported
    pub matches: usize,
    /// Recoverable errors diagnosed
    pub errors:  usize,
}

const _: () = {
    assert!(MAX_TARGETS > 0);
    assert!(MAX_PATH_LENGTH > 0);
    assert!(MAX_DEPTH > 0);
    // A path under MAX_PATH_LENGTH cannot nest deeper than this
    assert!(MAX_DEPTH >= MAX_PATH_LENGTH / 2);
};
