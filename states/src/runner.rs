//! Background job runner.
//!
//! Jobs are blocking closures executed on the tokio blocking pool. Each result
//! travels back over a `flume` channel together with the `TaskId` it was
//! started with, and the UI thread drains the channel once per frame.

use std::sync::Arc;

use flume::{Receiver, Sender};

use crate::TaskId;

pub use tokio::runtime::Runtime;

/// Builds the shared multi-thread runtime used by every [`JobRunner`].
pub fn build_runtime() -> std::io::Result<Arc<Runtime>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("qrverse-worker")
        .build()?;
    Ok(Arc::new(runtime))
}

pub struct JobRunner<R> {
    runtime: Arc<Runtime>,
    send: Sender<(TaskId, R)>,
    recv: Receiver<(TaskId, R)>,
}

impl<R> std::fmt::Debug for JobRunner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("pending_results", &self.recv.len())
            .finish_non_exhaustive()
    }
}

impl<R: Send + 'static> JobRunner<R> {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            runtime,
            send,
            recv,
        }
    }

    /// Runs `job` off the caller's thread. The result is queued even if
    /// nobody is interested in it any more; the receiver decides.
    pub fn spawn<F>(&self, id: TaskId, job: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let send = self.send.clone();
        log::debug!("spawn job generation={}", id.generation());
        self.runtime.spawn_blocking(move || {
            let result = job();
            if send.send((id, result)).is_err() {
                log::debug!(
                    "job generation={} finished after its receiver was dropped",
                    id.generation()
                );
            }
        });
    }

    /// Takes every result that has arrived so far without blocking.
    pub fn drain(&self) -> Vec<(TaskId, R)> {
        self.recv.try_iter().collect()
    }

    /// Blocks until the next result arrives or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<(TaskId, R)> {
        self.recv.recv_timeout(timeout).ok()
    }
}
