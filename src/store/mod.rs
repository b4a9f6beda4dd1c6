//! Job and result persistence interfaces.
//!
//! The stores are the only shared mutable state in the system. Both traits
//! are narrow by design: the orchestrator and the server depend on them, not
//! on a storage technology. [`memory::InMemoryStore`] is the reference
//! implementation backing the server.

pub mod memory;

pub use memory::InMemoryStore;

use thiserror::Error;
use uuid::Uuid;

use crate::document::StructuredDocument;
use crate::job::Job;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Job {job_id} not found")]
    NotFound { job_id: Uuid },

    #[error("No {language} document available for job {job_id}")]
    DocumentNotFound { job_id: Uuid, language: String },

    #[error("No uploaded file available for job {job_id}")]
    UploadNotFound { job_id: Uuid },
}

/// A rendered page image committed as an extraction artifact, so a resumed
/// job can re-enter recognition without re-running extraction.
#[derive(Debug, Clone)]
pub struct PageBitmap {
    pub page_index: usize,
    /// PNG-encoded page render.
    pub data: Vec<u8>,
}

/// Persists job records.
///
/// `update` must be atomic with respect to concurrent readers: a poller
/// observes either the record before the closure ran or after, never a
/// partially-mutated one. `try_claim`/`release` implement the dequeue
/// guarantee that at most one worker processes a given job at a time.
pub trait JobStore: Send + Sync {
    fn save(&self, job: Job) -> Result<(), StoreError>;

    fn load(&self, job_id: &Uuid) -> Result<Job, StoreError>;

    /// All jobs, newest first.
    fn list(&self) -> Result<Vec<Job>, StoreError>;

    fn delete(&self, job_id: &Uuid) -> Result<(), StoreError>;

    /// Atomic read-modify-write of one job record. Returns the updated job.
    fn update(
        &self,
        job_id: &Uuid,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError>;

    /// Attempts to take exclusive processing ownership of a job. Returns
    /// `false` if another worker already holds it.
    fn try_claim(&self, job_id: &Uuid) -> Result<bool, StoreError>;

    /// Releases processing ownership taken by [`try_claim`](Self::try_claim).
    fn release(&self, job_id: &Uuid);
}

/// Persists per-language structured documents and stage artifacts.
pub trait ResultStore: Send + Sync {
    /// Commits one language's document, keyed by `document.language`.
    /// Overwrites any previous commit for the same language.
    fn save_document(&self, job_id: &Uuid, document: &StructuredDocument)
        -> Result<(), StoreError>;

    fn load_document(&self, job_id: &Uuid, language: &str)
        -> Result<StructuredDocument, StoreError>;

    fn save_bitmaps(&self, job_id: &Uuid, bitmaps: &[PageBitmap]) -> Result<(), StoreError>;

    fn load_bitmaps(&self, job_id: &Uuid) -> Result<Vec<PageBitmap>, StoreError>;

    /// Stores the raw uploaded bytes so the pipeline (and any retry) can
    /// re-read them.
    fn save_upload(&self, job_id: &Uuid, bytes: &[u8]) -> Result<(), StoreError>;

    fn load_upload(&self, job_id: &Uuid) -> Result<Vec<u8>, StoreError>;

    /// Drops everything stored for a job.
    fn delete(&self, job_id: &Uuid);
}
