//! One worker per target filename, joined before returning

use std::any::Any;
use std::thread;

use tracing::debug;

use crate::error::Error;
use crate::reporter::Sink;
use crate::types::{SearchRequest, WalkStats, WorkerId};
use crate::walker::Walker;

/// Outcome of a whole search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Workers that started
    pub launched:        usize,
    /// Targets whose worker could not be started
    pub launch_failures: usize,
    /// Workers that stopped before finishing their walk
    pub crashed:         usize,
    /// Matches reported over all workers
    pub matches:         usize,
    /// Recoverable errors diagnosed over all workers
    pub errors:          usize,
}

impl RunSummary {
    /// Whether every target was searched to completion
    ///
    /// Finding nothing is still a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.launch_failures == 0 && self.crashed == 0
    }

    /// Process exit status for this outcome
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    const fn record(&mut self, stats: &WalkStats) {
        self.matches += stats.matches;
        self.errors += stats.errors;
    }
}

/// Search every target of `request` concurrently
///
/// Starts one thread per target, each walking the whole root for its own
/// filename, and waits for all of them. A target whose thread cannot be
/// started or that panics is diagnosed and makes the run fail; the other
/// targets are unaffected.
pub fn run<S: Sink>(request: &SearchRequest, sink: &S) -> RunSummary {
    let mut summary = RunSummary::default();

    thread::scope(|scope| {
        let mut workers = Vec::with_capacity(request.targets().len());

        for (index, target) in request.targets().iter().enumerate() {
            let worker = WorkerId::from_index(index);
            let context = request.context(target);
            let spawned = thread::Builder::new()
                .name(format!("namefind-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    Walker::new(context, worker).walk(request.root(), sink)
                });

            match spawned {
                Ok(handle) => {
                    debug!(%worker, target = %target, "worker started");
                    summary.launched += 1;
                    workers.push((worker, target, handle));
                },
                Err(source) => {
                    summary.launch_failures += 1;
                    sink.diagnose(worker, target, &Error::Launch { source });
                },
            }
        }

        for (worker, target, handle) in workers {
            match handle.join() {
                Ok(stats) => {
                    debug!(
                        %worker,
                        target = %target,
                        dirs = stats.dirs,
                        files = stats.files,
                        matches = stats.matches,
                        errors = stats.errors,
                        "worker finished"
                    );
                    summary.record(&stats);
                },
                Err(payload) => {
                    summary.crashed += 1;
                    let message = panic_message(payload.as_ref());
                    sink.diagnose(worker, target, &Error::WorkerPanicked { message });
                },
            }
        }
    });

    debug!(?summary, "search finished");
    summary
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
