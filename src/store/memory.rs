//! In-memory store implementation.
//!
//! Backs both store traits with `parking_lot` locked maps. Every job record
//! is replaced wholesale under the write lock, so readers always see a
//! consistent snapshot (status and stage statuses from the same write).

use std::collections::{HashMap, HashSet};

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::document::StructuredDocument;
use crate::job::Job;
use crate::store::{JobStore, PageBitmap, ResultStore, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    documents: RwLock<HashMap<(Uuid, String), StructuredDocument>>,
    bitmaps: RwLock<HashMap<Uuid, Vec<PageBitmap>>>,
    uploads: RwLock<HashMap<Uuid, Vec<u8>>>,
    /// Jobs currently owned by a worker.
    active: Mutex<HashSet<Uuid>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryStore {
    fn save(&self, job: Job) -> Result<(), StoreError> {
        self.jobs.write().insert(job.job_id, job);
        Ok(())
    }

    fn load(&self, job_id: &Uuid) -> Result<Job, StoreError> {
        self.jobs
            .read()
            .get(job_id)
            .cloned()
            .ok_or(StoreError::NotFound { job_id: *job_id })
    }

    fn list(&self) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<Job> = self.jobs.read().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn delete(&self, job_id: &Uuid) -> Result<(), StoreError> {
        self.jobs
            .write()
            .remove(job_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { job_id: *job_id })
    }

    fn update(
        &self,
        job_id: &Uuid,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write();
        let job = jobs
            .get_mut(job_id)
            .ok_or(StoreError::NotFound { job_id: *job_id })?;
        mutate(job);
        Ok(job.clone())
    }

    fn try_claim(&self, job_id: &Uuid) -> Result<bool, StoreError> {
        if !self.jobs.read().contains_key(job_id) {
            return Err(StoreError::NotFound { job_id: *job_id });
        }
        Ok(self.active.lock().insert(*job_id))
    }

    fn release(&self, job_id: &Uuid) {
        self.active.lock().remove(job_id);
    }
}

impl ResultStore for InMemoryStore {
    fn save_document(
        &self,
        job_id: &Uuid,
        document: &StructuredDocument,
    ) -> Result<(), StoreError> {
        self.documents
            .write()
            .insert((*job_id, document.language.clone()), document.clone());
        Ok(())
    }

    fn load_document(
        &self,
        job_id: &Uuid,
        language: &str,
    ) -> Result<StructuredDocument, StoreError> {
        self.documents
            .read()
            .get(&(*job_id, language.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound {
                job_id: *job_id,
                language: language.to_string(),
            })
    }

    fn save_bitmaps(&self, job_id: &Uuid, bitmaps: &[PageBitmap]) -> Result<(), StoreError> {
        self.bitmaps.write().insert(*job_id, bitmaps.to_vec());
        Ok(())
    }

    fn load_bitmaps(&self, job_id: &Uuid) -> Result<Vec<PageBitmap>, StoreError> {
        Ok(self
            .bitmaps
            .read()
            .get(job_id)
            .cloned()
            .unwrap_or_default())
    }

    fn save_upload(&self, job_id: &Uuid, bytes: &[u8]) -> Result<(), StoreError> {
        self.uploads.write().insert(*job_id, bytes.to_vec());
        Ok(())
    }

    fn load_upload(&self, job_id: &Uuid) -> Result<Vec<u8>, StoreError> {
        self.uploads
            .read()
            .get(job_id)
            .cloned()
            .ok_or(StoreError::UploadNotFound { job_id: *job_id })
    }

    fn delete(&self, job_id: &Uuid) {
        self.documents
            .write()
            .retain(|(id, _), _| id != job_id);
        self.bitmaps.write().remove(job_id);
        self.uploads.write().remove(job_id);
    }
}
