//! Bounded-concurrency probe dispatcher.
//!
//! Ports are fed through a bounded job queue to a fixed pool of worker
//! tasks. Each worker runs one probe at a time, so the pool size caps the
//! number of sockets open at once. Outcomes flow back over a results
//! channel and are collected in completion order.

use crate::scanner::traits::{Probe, ProbeOutcome, ProbeState, ProgressReporter};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 50;

type JobQueue = Arc<Mutex<mpsc::Receiver<u16>>>;

/// Drives one probe per port through a fixed-size worker pool.
pub struct Dispatcher {
    probe: Arc<dyn Probe>,
    workers: usize,
}

impl Dispatcher {
    /// Create a dispatcher. A worker count of zero is raised to one.
    pub fn new(probe: Arc<dyn Probe>, workers: usize) -> Self {
        Self {
            probe,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Probe every port and return one outcome per port, in completion order.
    ///
    /// `progress` is told about every completion; the completed count it
    /// sees increases by one each call.
    pub async fn run<P>(&self, ports: &[u16], progress: &P) -> Vec<ProbeOutcome>
    where
        P: ProgressReporter + ?Sized,
    {
        let total = ports.len();
        let pool_size = self.workers.min(total.max(1));

        let (job_tx, job_rx) = mpsc::channel::<u16>(pool_size);
        let job_rx: JobQueue = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<ProbeOutcome>(pool_size);

        let mut pool = JoinSet::new();
        for id in 0..pool_size {
            pool.spawn(worker(
                id,
                Arc::clone(&self.probe),
                Arc::clone(&job_rx),
                result_tx.clone(),
            ));
        }
        // The results channel closes once every worker has exited.
        drop(result_tx);

        let queued = ports.to_vec();
        let feeder = tokio::spawn(async move {
            for port in queued {
                if job_tx.send(port).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
            progress.advance(outcomes.len(), total);
        }
        progress.finish();

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "worker exited abnormally");
            }
        }
        if let Err(e) = feeder.await {
            tracing::warn!(error = %e, "job feeder exited abnormally");
        }

        outcomes
    }
}

async fn worker(
    id: usize,
    probe: Arc<dyn Probe>,
    jobs: JobQueue,
    results: mpsc::Sender<ProbeOutcome>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(port) = next else {
            break;
        };

        let outcome = run_isolated(Arc::clone(&probe), port).await;
        if results.send(outcome).await.is_err() {
            break;
        }
    }
    tracing::trace!(worker = id, "worker drained");
}

/// Run one probe in its own task so a panic becomes an Error outcome
/// instead of taking the worker down.
async fn run_isolated(probe: Arc<dyn Probe>, port: u16) -> ProbeOutcome {
    let protocol = probe.protocol();
    match tokio::spawn(async move { probe.probe(port).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(port, error = %e, "probe task failed");
            ProbeOutcome::new(
                port,
                ProbeState::Error,
                protocol,
                format!("probe task failed: {e}"),
            )
        }
    }
}
