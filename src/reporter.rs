//! Line-atomic output for matches and diagnostics

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Error;
use crate::types::{MatchEvent, WorkerId};

/// Destination for everything a worker has to say
///
/// Implementations are shared by all workers of a run, so every call must
/// produce its output as one unit.
pub trait Sink: Sync {
    /// Write one match line
    ///
    /// # Errors
    /// Returns error if the match stream cannot be written
    fn report(&self, event: &MatchEvent<'_>) -> io::Result<()>;

    /// Write one diagnostic line for a recoverable error
    fn diagnose(&self, worker: WorkerId, target: &str, error: &Error);
}

/// Sink over a match stream and a diagnostic stream
///
/// # Design
/// - Each line is composed in full before its stream is locked
/// - A line is written with one `write_all` under the stream's lock
/// - The lock is a guard, released on every exit path
#[derive(Debug)]
pub struct Reporter<O, E> {
    /// Match stream
    out: Mutex<O>,
    /// Diagnostic stream
    err: Mutex<E>,
}

impl Reporter<io::Stdout, io::Stderr> {
    /// Reporter writing matches to stdout and diagnostics to stderr
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// Create a reporter over the given streams
    pub const fn new(out: O, err: E) -> Self {
        Self { out: Mutex::new(out), err: Mutex::new(err) }
    }

    /// Take the streams back
    pub fn into_inner(self) -> (O, E) {
        (
            self.out.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.err.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

/// Lock a stream, recovering it if a writer panicked while holding it
fn lock<W>(stream: &Mutex<W>) -> MutexGuard<'_, W> {
    stream.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write a complete line and flush it while holding the stream
fn write_line<W: Write>(stream: &Mutex<W>, line: &[u8]) -> io::Result<()> {
    let mut guard = lock(stream);
    guard.write_all(line)?;
    guard.flush()
}

/// `<worker>: <target>: <path>\n`, path bytes kept verbatim
fn match_line(event: &MatchEvent<'_>) -> Vec<u8> {
    let path = event.path.as_os_str().as_encoded_bytes();
    let mut line = Vec::with_capacity(path.len() + event.target.len() + 16);
    line.extend_from_slice(format!("{}: {}: ", event.worker, event.target).as_bytes());
    line.extend_from_slice(path);
    line.push(b'\n');
    line
}

impl<O, E> Sink for Reporter<O, E>
where
    O: Write + Send,
    E: Write + Send,
{
    fn report(&self, event: &MatchEvent<'_>) -> io::Result<()> {
        write_line(&self.out, &match_line(event))
    }

    fn diagnose(&self, worker: WorkerId, target: &str, error: &Error) {
        let line = format!("{worker}: {target}: {error}\n");
        // Nowhere left to report a failing diagnostic stream
        let _ = write_line(&self.err, line.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    fn event<'a>(worker: usize, target: &'a str, path: &'a Path) -> MatchEvent<'a> {
        MatchEvent { worker: WorkerId::from_index(worker), target, path }
    }

    /// Writer that fails every write after the first
    struct Flaky {
        failed: Arc<AtomicBool>,
        buf:    Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.failed.swap(true, Ordering::SeqCst) {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_match_line_format() {
        let reporter = Reporter::new(Vec::new(), Vec::new());
        let path = PathBuf::from("/srv/data/b.txt");
        reporter.report(&event(2, "b.txt", &path)).unwrap();

        let (out, err) = reporter.into_inner();
        assert_eq!(out, b"3: b.txt: /srv/data/b.txt\n");
        assert!(err.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_path_bytes_are_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let reporter = Reporter::new(Vec::new(), Vec::new());
        let path = Path::new(OsStr::from_bytes(b"/tmp/\xff.bin"));
        reporter.report(&event(0, "x", path)).unwrap();

        let (out, _) = reporter.into_inner();
        assert_eq!(out, b"1: x: /tmp/\xff.bin\n");
    }

    #[test]
    fn test_diagnostics_go_to_error_stream() {
        let reporter = Reporter::new(Vec::new(), Vec::new());
        let error = Error::OpenDir {
            path:   PathBuf::from("/root/secret"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        reporter.diagnose(WorkerId::from_index(0), "a.txt", &error);

        let (out, err) = reporter.into_inner();
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("1: a.txt: cannot open directory '/root/secret': "));
        assert!(err.ends_with('\n'));
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn test_stream_released_after_write_error() {
        let failed = Arc::new(AtomicBool::new(false));
        let reporter = Reporter::new(Flaky { failed, buf: Vec::new() }, Vec::new());
        let path = PathBuf::from("/a");

        assert!(reporter.report(&event(0, "a", &path)).is_ok());
        assert!(reporter.report(&event(0, "a", &path)).is_err());
        // Lock is free again and the stream keeps its earlier output
        assert!(reporter.out.try_lock().is_ok());
        let (out, _) = reporter.into_inner();
        assert_eq!(out.buf, b"1: a: /a\n");
    }

    #[test]
    fn test_concurrent_lines_never_interleave() {
        const WRITERS: usize = 16;
        const LINES: usize = 200;

        let reporter = Reporter::new(Vec::new(), Vec::new());
        thread::scope(|scope| {
            for w in 0..WRITERS {
                let reporter = &reporter;
                scope.spawn(move || {
                    let target = format!("target_{w}.txt");
                    let path = PathBuf::from(format!("/deep/{}/{target}", "x".repeat(w * 10)));
                    for _ in 0..LINES {
                        reporter.report(&event(w, &target, &path)).unwrap();
                    }
                });
            }
        });

        let (out, _) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), WRITERS * LINES);
        for line in out.lines() {
            let mut fields = line.splitn(3, ": ");
            let worker: usize = fields.next().unwrap().parse().unwrap();
            let target = fields.next().unwrap();
            let path = fields.next().unwrap();
            assert_eq!(target, format!("target_{}.txt", worker - 1));
            assert!(path.ends_with(&format!("/{target}")));
            assert_eq!(path.len(), "/deep//".len() + (worker - 1) * 10 + target.len());
        }
    }
}
