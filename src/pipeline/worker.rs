//! Worker pool and job queue.
//!
//! A bounded pool of workers pulls queued job ids from a shared channel.
//! Each job runs its whole pipeline on a single worker (the store's claim
//! operation guarantees at-most-one active worker per job), wrapped in a
//! blocking task because every stage is a blocking adapter call, and bounded
//! by the configured maximum job duration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::pipeline::orchestrator::Orchestrator;
use crate::pipeline::PipelineError;
use crate::store::JobStore;

/// Submission handle for the processing queue.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Uuid>,
}

impl JobQueue {
    /// Enqueues a job id for processing. Returns `false` if the worker pool
    /// has shut down.
    pub fn submit(&self, job_id: Uuid) -> bool {
        self.tx.send(job_id).is_ok()
    }
}

/// Creates the queue and its receiving end for a worker pool.
#[must_use]
pub fn job_queue() -> (JobQueue, mpsc::UnboundedReceiver<Uuid>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (JobQueue { tx }, rx)
}

pub struct WorkerPool {
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` workers sharing one queue receiver.
    pub fn spawn(
        worker_count: usize,
        receiver: mpsc::UnboundedReceiver<Uuid>,
        orchestrator: Arc<Orchestrator>,
        jobs: Arc<dyn JobStore>,
        job_timeout: Duration,
    ) -> Self {
        let receiver = Arc::new(Mutex::new(receiver));
        let mut handles = Vec::with_capacity(worker_count.max(1));

        for worker_index in 0..worker_count.max(1) {
            let receiver = Arc::clone(&receiver);
            let orchestrator = Arc::clone(&orchestrator);
            let jobs = Arc::clone(&jobs);

            handles.push(tokio::spawn(async move {
                info!(worker_index, "worker started");
                loop {
                    let job_id = { receiver.lock().await.recv().await };
                    let Some(job_id) = job_id else {
                        debug!(worker_index, "queue closed, worker stopping");
                        break;
                    };

                    process_one(&orchestrator, &jobs, job_id, job_timeout).await;
                }
            }));
        }

        Self { handles }
    }

    /// Aborts all workers. Used on shutdown.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn process_one(
    orchestrator: &Arc<Orchestrator>,
    jobs: &Arc<dyn JobStore>,
    job_id: Uuid,
    job_timeout: Duration,
) {
    match jobs.try_claim(&job_id) {
        Ok(true) => {}
        Ok(false) => {
            debug!(%job_id, "job already claimed by another worker, skipping");
            return;
        }
        Err(err) => {
            warn!(%job_id, "cannot claim job: {err}");
            return;
        }
    }

    let mut pipeline = {
        let orchestrator = Arc::clone(orchestrator);
        tokio::task::spawn_blocking(move || orchestrator.run(&job_id))
    };

    match tokio::time::timeout(job_timeout, &mut pipeline).await {
        Ok(Ok(())) => {
            jobs.release(&job_id);
        }
        Ok(Err(join_err)) => {
            warn!(%job_id, "pipeline task panicked: {join_err}");
            let _ = jobs.update(&job_id, &mut |job| {
                if !job.is_terminal() {
                    job.fail_in_progress("internal processing error");
                }
            });
            jobs.release(&job_id);
        }
        Err(_elapsed) => {
            let minutes = job_timeout.as_secs() / 60;
            let message = PipelineError::Timeout { minutes }.to_string();
            warn!(%job_id, "forcibly failing job: {message}");
            let _ = jobs.update(&job_id, &mut |job| {
                if !job.is_terminal() {
                    job.fail_in_progress(message.clone());
                }
            });
            // The blocking call is abandoned, best-effort. The claim is held
            // until it actually returns, so a retry cannot overlap with it;
            // stage output already committed stays available either way.
            let jobs = Arc::clone(jobs);
            tokio::spawn(async move {
                let _ = pipeline.await;
                jobs.release(&job_id);
            });
        }
    }
}
