//! Job pipeline: orchestration, workers, and the failure taxonomy.

pub mod error;
pub mod orchestrator;
pub mod worker;

pub use error::{ErrorClass, PipelineError};
pub use orchestrator::Orchestrator;
pub use worker::{job_queue, JobQueue, WorkerPool};
