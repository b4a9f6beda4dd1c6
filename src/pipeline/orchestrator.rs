//! Pipeline orchestrator.
//!
//! Drives one job through extraction → recognition → translation. Each stage
//! commits its output to the result store **before** its status advances, so
//! a crash mid-pipeline leaves the last completed stage's output durably
//! available; re-running a job re-enters at the first non-completed stage.
//!
//! Adapter errors never escape this module: every failure becomes the job's
//! terminal failed state with a human-readable message.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::document::{CorrespondenceMap, DocumentError, StructuredDocument};
use crate::extract::Extractor;
use crate::job::{Job, JobStats, JobStatus, Stage, StageStatus};
use crate::pipeline::error::PipelineError;
use crate::recognize::{BitmapRegion, Recognizer};
use crate::store::{JobStore, ResultStore};
use crate::translate::{BlockText, Translator};
use crate::utils::text::normalize_text;

pub struct Orchestrator {
    jobs: Arc<dyn JobStore>,
    results: Arc<dyn ResultStore>,
    extractor: Arc<dyn Extractor>,
    recognizer: Arc<dyn Recognizer>,
    translator: Arc<dyn Translator>,
    translation_batch_size: usize,
}

impl Orchestrator {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        results: Arc<dyn ResultStore>,
        extractor: Arc<dyn Extractor>,
        recognizer: Arc<dyn Recognizer>,
        translator: Arc<dyn Translator>,
        translation_batch_size: usize,
    ) -> Self {
        Self {
            jobs,
            results,
            extractor,
            recognizer,
            translator,
            translation_batch_size: translation_batch_size.max(1),
        }
    }

    /// Runs the pipeline for one job, converting any stage error into the
    /// job's terminal failed state. This is the orchestration boundary:
    /// nothing below it is raised to the caller.
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub fn run(&self, job_id: &Uuid) {
        match self.execute(job_id) {
            Ok(()) => {}
            Err(PipelineError::Terminated) => {
                info!("pipeline stopped: job was terminated externally");
            }
            Err(err) => {
                let class = err.class();
                error!(%class, "pipeline failed: {err}");
                let message = err.to_string();
                let result = self.jobs.update(job_id, &mut |job| {
                    if !job.is_terminal() {
                        job.fail_in_progress(message.clone());
                    }
                });
                if let Err(store_err) = result {
                    warn!("failed to record job failure: {store_err}");
                }
            }
        }
    }

    fn execute(&self, job_id: &Uuid) -> Result<(), PipelineError> {
        let mut job = self.jobs.load(job_id)?;

        if job.status == JobStatus::Completed {
            info!("job already completed, nothing to do");
            return Ok(());
        }
        if job.status == JobStatus::Failed {
            // Re-submission: re-enter at the first non-completed stage.
            job = self.jobs.update(job_id, &mut |job| job.prepare_retry())?;
        }

        if job.stages.extraction != StageStatus::Completed {
            self.run_extraction(&job)?;
        } else {
            info!("extraction output already committed, skipping stage");
        }

        let job = self.jobs.load(job_id)?;
        if job.stages.ocr != StageStatus::Completed {
            self.run_recognition(&job)?;
        } else {
            info!("recognition output already committed, skipping stage");
        }

        let job = self.jobs.load(job_id)?;
        if job.stages.translation != StageStatus::Completed {
            self.run_translation(&job)?;
        }

        let job = self.jobs.load(job_id)?;
        info!(status = ?job.status, "pipeline finished");
        Ok(())
    }

    #[instrument(skip_all, fields(job_id = %job.job_id))]
    fn run_extraction(&self, job: &Job) -> Result<(), PipelineError> {
        self.advance(&job.job_id, Stage::Extraction, StageStatus::InProgress)?;

        let bytes = self.results.load_upload(&job.job_id)?;
        let started = std::time::Instant::now();

        let mut extraction =
            self.extractor
                .extract(&bytes, job.format, &job.original_filename)?;

        let ocr_pages = extraction.ocr_pages();
        let document = &mut extraction.document;
        document.language = job.options.source_language.clone();
        document.metadata.processing_seconds = Some(started.elapsed().as_secs_f64());
        if !ocr_pages.is_empty() {
            document.metadata.ocr_engine = Some(self.recognizer.name().to_string());
        }

        for block in document.blocks_mut() {
            block.text = normalize_text(&block.text);
        }

        document.validate()?;

        info!(
            pages = document.metadata.total_pages,
            blocks = document.block_count(),
            flagged = ocr_pages.len(),
            "extraction produced source document"
        );

        // Commit before the stage status advances.
        self.results.save_document(&job.job_id, document)?;
        self.results.save_bitmaps(&job.job_id, &extraction.bitmaps)?;

        let stats = JobStats {
            total_pages: document.metadata.total_pages,
            total_blocks: document.block_count(),
            source_characters: document.character_count(),
            target_characters: None,
            ocr_pages: ocr_pages.len(),
        };
        self.jobs.update(&job.job_id, &mut |job| {
            if !job.is_terminal() {
                job.ocr_pages = ocr_pages.clone();
                job.stats = Some(stats.clone());
            }
        })?;

        self.advance(&job.job_id, Stage::Extraction, StageStatus::Completed)?;
        Ok(())
    }

    #[instrument(skip_all, fields(job_id = %job.job_id))]
    fn run_recognition(&self, job: &Job) -> Result<(), PipelineError> {
        self.advance(&job.job_id, Stage::Ocr, StageStatus::InProgress)?;

        let job = self.jobs.load(&job.job_id)?;
        if job.ocr_pages.is_empty() {
            // Text-native document: the stage is recorded as trivially
            // satisfied so stage reporting stays symmetric, but the engine
            // is never invoked.
            info!("no pages flagged for recognition, completing stage trivially");
            self.advance(&job.job_id, Stage::Ocr, StageStatus::Completed)?;
            return Ok(());
        }

        let source_language = job.options.source_language.clone();
        let mut document = self
            .results
            .load_document(&job.job_id, &source_language)?;
        let bitmaps = self.results.load_bitmaps(&job.job_id)?;

        let regions = collect_regions(&document, &bitmaps, &job.ocr_pages);
        info!(regions = regions.len(), "running recognition");

        let recognized = self.recognizer.recognize(&regions)?;

        for region_text in recognized {
            let block = document
                .find_block_mut(&region_text.block_id)
                .ok_or_else(|| DocumentError::Malformed {
                    message: format!(
                        "recognition returned unknown block id {}",
                        region_text.block_id
                    ),
                })?;
            block.text = normalize_text(&region_text.text);
            block.metadata.confidence = Some(region_text.confidence);
            block.metadata.bbox = Some(region_text.bbox);
        }

        self.results.save_document(&job.job_id, &document)?;

        let source_characters = document.character_count();
        self.jobs.update(&job.job_id, &mut |job| {
            if !job.is_terminal() {
                if let Some(stats) = job.stats.as_mut() {
                    stats.source_characters = source_characters;
                }
            }
        })?;

        self.advance(&job.job_id, Stage::Ocr, StageStatus::Completed)?;
        Ok(())
    }

    #[instrument(skip_all, fields(job_id = %job.job_id))]
    fn run_translation(&self, job: &Job) -> Result<(), PipelineError> {
        self.advance(&job.job_id, Stage::Translation, StageStatus::InProgress)?;

        let source = self
            .results
            .load_document(&job.job_id, &job.options.source_language)?;

        let pending: Vec<BlockText> = source
            .blocks()
            .filter(|block| !block.text.trim().is_empty())
            .map(|block| BlockText {
                block_id: block.block_id.clone(),
                text: block.text.clone(),
            })
            .collect();

        info!(
            blocks = pending.len(),
            batch_size = self.translation_batch_size,
            "translating source document"
        );

        let mut translated: HashMap<String, String> = HashMap::with_capacity(pending.len());
        for batch in pending.chunks(self.translation_batch_size) {
            let output = self.translator.translate(batch)?;
            verify_batch(batch, &output)?;
            for block in output {
                translated.insert(block.block_id, block.text);
            }
        }

        let mut target = source.clone();
        target.language = job.options.target_language.clone();
        for block in target.blocks_mut() {
            if let Some(text) = translated.remove(&block.block_id) {
                block.text = text;
            }
            // Confidence and geometry describe the source rendering only.
            block.metadata.confidence = None;
            block.metadata.bbox = None;
        }

        target.validate()?;
        CorrespondenceMap::pair(&source, &target)?;

        self.results.save_document(&job.job_id, &target)?;

        let target_characters = target.character_count();
        self.jobs.update(&job.job_id, &mut |job| {
            if !job.is_terminal() {
                if let Some(stats) = job.stats.as_mut() {
                    stats.target_characters = Some(target_characters);
                }
            }
        })?;

        self.advance(&job.job_id, Stage::Translation, StageStatus::Completed)?;
        Ok(())
    }

    /// Single guarded stage transition. A job that turned terminal while the
    /// pipeline was running (forcible timeout) must not advance further; the
    /// transition is refused and the pipeline unwinds with `Terminated`.
    fn advance(
        &self,
        job_id: &Uuid,
        stage: Stage,
        status: StageStatus,
    ) -> Result<(), PipelineError> {
        let updated = self.jobs.update(job_id, &mut |job| {
            if !job.is_terminal() {
                job.set_stage(stage, status);
            }
        })?;

        if updated.stages.get(stage) == status {
            Ok(())
        } else {
            Err(PipelineError::Terminated)
        }
    }
}

/// Joins the flagged pages' region blocks with their committed bitmaps.
///
/// Extraction guarantees one region block per flagged page; pages whose
/// bitmap is missing are skipped with a warning rather than failing the
/// whole job.
fn collect_regions(
    document: &StructuredDocument,
    bitmaps: &[crate::store::PageBitmap],
    ocr_pages: &[usize],
) -> Vec<BitmapRegion> {
    let by_page: HashMap<usize, &[u8]> = bitmaps
        .iter()
        .map(|bitmap| (bitmap.page_index, bitmap.data.as_slice()))
        .collect();

    let mut regions = Vec::new();
    for page in &document.pages {
        if !ocr_pages.contains(&page.page_index) {
            continue;
        }
        let Some(data) = by_page.get(&page.page_index) else {
            warn!(
                page_index = page.page_index,
                "no committed bitmap for flagged page"
            );
            continue;
        };
        for block in &page.blocks {
            regions.push(BitmapRegion {
                block_id: block.block_id.clone(),
                page_index: page.page_index,
                data: data.to_vec(),
            });
        }
    }
    regions
}

/// Verifies that a translation batch preserved its block id set bijectively.
fn verify_batch(input: &[BlockText], output: &[BlockText]) -> Result<(), DocumentError> {
    let sent: std::collections::HashSet<&str> =
        input.iter().map(|block| block.block_id.as_str()).collect();
    let received: std::collections::HashSet<&str> =
        output.iter().map(|block| block.block_id.as_str()).collect();

    if sent == received && input.len() == output.len() {
        return Ok(());
    }

    Err(DocumentError::CorrespondenceMismatch {
        missing: sent
            .difference(&received)
            .map(|id| (*id).to_string())
            .collect(),
        unexpected: received
            .difference(&sent)
            .map(|id| (*id).to_string())
            .collect(),
    })
}
