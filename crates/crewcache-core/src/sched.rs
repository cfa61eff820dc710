//! Execution contexts for background work and UI-affinity callbacks.
//!
//! Two named contexts, passed explicitly into every component that
//! needs them - there is no ambient global scheduler:
//!
//! - Background: a tokio runtime handle where all blocking I/O runs
//!   (network fetches, cache reads and writes).
//! - Affinity: a single-consumer job queue standing in for the UI
//!   thread. Jobs execute strictly in dispatch order on whichever task
//!   drives the `AffinityQueue`, so observer notifications and
//!   projection writes are serialized.
//!
//! Tests construct a `Scheduler` over a current-thread runtime and call
//! `AffinityQueue::drain` for deterministic, synchronous delivery.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

type AffinityJob = Box<dyn FnOnce() + Send>;

/// Handle pair naming the two execution contexts.
#[derive(Clone)]
pub struct Scheduler {
    background: Handle,
    affinity_tx: mpsc::UnboundedSender<AffinityJob>,
}

impl Scheduler {
    /// Build a scheduler over the given background runtime handle.
    /// Returns the queue end; exactly one consumer must drive it.
    pub fn new(background: Handle) -> (Self, AffinityQueue) {
        let (affinity_tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                background,
                affinity_tx,
            },
            AffinityQueue { rx },
        )
    }

    /// Run a future on the background context.
    pub fn spawn_background<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.background.spawn(future)
    }

    /// Enqueue a job for the affinity context. Non-blocking; if the
    /// queue consumer is gone the job is dropped with a warning.
    pub fn on_affinity(&self, job: impl FnOnce() + Send + 'static) {
        if self.affinity_tx.send(Box::new(job)).is_err() {
            warn!("Affinity queue closed, dropping dispatched job");
        }
    }
}

/// Consumer end of the affinity context.
pub struct AffinityQueue {
    rx: mpsc::UnboundedReceiver<AffinityJob>,
}

impl AffinityQueue {
    /// Execute jobs as they arrive until every `Scheduler` clone is
    /// dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job();
        }
    }

    /// Execute everything currently queued, in dispatch order.
    /// Returns the number of jobs run.
    pub fn drain(&mut self) -> usize {
        let mut executed = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            executed += 1;
        }
        executed
    }
}
