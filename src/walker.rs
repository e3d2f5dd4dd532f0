//! Depth-first directory walk for one target filename

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

use tracing::trace;

use crate::error::{Error, Result};
use crate::matcher;
use crate::reporter::Sink;
use crate::types::{MAX_DEPTH, MAX_PATH_LENGTH, MatchEvent, WalkContext, WalkStats, WorkerId};

/// A directory entry read ahead of its visit
///
/// Holds no reference to the listing, so the directory handle is closed
/// as soon as the listing has been read.
#[derive(Debug)]
struct Entry {
    /// Name as listed
    name: OsString,
    /// Parent path joined with the name
    path: PathBuf,
}

/// A directory whose entries are being visited
#[derive(Debug)]
struct Frame {
    /// Entries not visited yet
    entries: vec::IntoIter<Entry>,
}

/// Walker that searches one tree for one filename
///
/// Each directory is read in full and closed before any of its entries is
/// visited, so a walk holds at most one directory handle at a time however
/// deep it goes. Pending entries are kept on an explicit stack, which
/// visits them in the same order a recursive walk would without growing
/// the thread's call stack.
#[derive(Debug)]
pub struct Walker<'a> {
    /// What this walk looks for
    context:    WalkContext<'a>,
    /// Worker the walk belongs to
    worker:     WorkerId,
    /// Directories currently being visited, innermost last
    stack:      Vec<Frame>,
    /// Counters for this walk
    stats:      WalkStats,
    /// Directory that fails to open as if access were denied
    #[cfg(test)]
    unreadable: Option<PathBuf>,
}

impl<'a> Walker<'a> {
    /// Create a walker for one worker's context
    #[must_use]
    pub const fn new(context: WalkContext<'a>, worker: WorkerId) -> Self {
        Self {
            context,
            worker,
            stack: Vec::new(),
            stats: WalkStats { dirs: 0, files: 0, matches: 0, errors: 0 },
            #[cfg(test)]
            unreadable: None,
        }
    }

    /// Walk the tree under `root`, reporting matches and errors to `sink`
    ///
    /// Errors never stop the walk: each is reported and only the subtree
    /// or entry it concerns is skipped.
    pub fn walk<S: Sink + ?Sized>(mut self, root: &Path, sink: &S) -> WalkStats {
        self.enter(root.to_path_buf(), sink);

        while let Some(frame) = self.stack.last_mut() {
            match frame.entries.next() {
                Some(entry) => self.visit(entry, sink),
                None => {
                    self.stack.pop();
                },
            }
        }

        self.stats
    }

    /// Read a directory in full and push its entries for visiting
    fn enter<S: Sink + ?Sized>(&mut self, path: PathBuf, sink: &S) {
        if self.stack.len() >= MAX_DEPTH {
            self.diagnose(sink, &Error::DepthExceeded { path });
            return;
        }

        #[cfg(test)]
        if self.unreadable.as_deref() == Some(path.as_path()) {
            let source = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
            self.diagnose(sink, &Error::OpenDir { path, source });
            return;
        }

        let listing = match fs::read_dir(&path) {
            Ok(listing) => listing,
            Err(source) => {
                self.diagnose(sink, &Error::OpenDir { path, source });
                return;
            },
        };

        trace!(worker = %self.worker, dir = %path.display(), "entering directory");
        self.stats.dirs += 1;

        let mut entries = Vec::new();
        for entry in listing {
            match entry {
                Ok(entry) => entries.push(Entry { name: entry.file_name(), path: entry.path() }),
                Err(source) => {
                    // Listing is broken, keep what was read before it
                    self.diagnose(sink, &Error::ReadEntry { path: path.clone(), source });
                    break;
                },
            }
        }

        self.stack.push(Frame { entries: entries.into_iter() });
    }

    /// Classify one entry and act on it
    fn visit<S: Sink + ?Sized>(&mut self, entry: Entry, sink: &S) {
        let Entry { name, path } = entry;
        if name == "." || name == ".." {
            return;
        }

        if let Err(e) = validate_path(&path) {
            self.diagnose(sink, &e);
            return;
        }

        // The listing's type hint may be missing, so always ask the filesystem
        let file_type = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata.file_type(),
            Err(source) => {
                self.diagnose(sink, &Error::Metadata { path, source });
                return;
            },
        };

        if file_type.is_file() {
            self.stats.files += 1;
            if matcher::matches_name(&name, self.context.target, self.context.case_insensitive) {
                self.emit(&path, sink);
            }
        } else if file_type.is_dir() && self.context.recursive {
            self.enter(path, sink);
        }
    }

    /// Resolve a matching file and report it
    fn emit<S: Sink + ?Sized>(&mut self, path: &Path, sink: &S) {
        let absolute = match fs::canonicalize(path) {
            Ok(absolute) => absolute,
            Err(source) => {
                self.diagnose(sink, &Error::Resolve { path: path.to_path_buf(), source });
                return;
            },
        };

        let event =
            MatchEvent { worker: self.worker, target: self.context.target, path: &absolute };
        match sink.report(&event) {
            Ok(()) => self.stats.matches += 1,
            Err(source) => self.diagnose(sink, &Error::Report { path: absolute, source }),
        }
    }

    fn diagnose<S: Sink + ?Sized>(&mut self, sink: &S, error: &Error) {
        self.stats.errors += 1;
        sink.diagnose(self.worker, self.context.target, error);
    }
}

/// Validate a composed path against the platform limit
fn validate_path(path: &Path) -> Result<()> {
    let len = path.as_os_str().len();
    if len >= MAX_PATH_LENGTH {
        return Err(Error::PathTooLong { path: path.to_path_buf(), len });
    }
    Ok(())
}
