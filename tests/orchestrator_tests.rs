use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use linguadoc::document::{
    block_id, Block, BlockKind, BoundingBox, DocumentError, DocumentFormat, Page,
    StructuredDocument,
};
use linguadoc::extract::{Extraction, Extractor};
use linguadoc::job::{Job, JobOptions, JobStatus, StageStatus};
use linguadoc::pipeline::Orchestrator;
use linguadoc::recognize::{BitmapRegion, RecognizeError, Recognizer, RegionText};
use linguadoc::store::{InMemoryStore, JobStore, PageBitmap, ResultStore};
use linguadoc::translate::{BlockText, TranslateError, Translator};
use uuid::Uuid;

/// Produces a fixed two-page text-native document (one heading and one
/// paragraph per page), or a single flagged bitmap page, counting
/// invocations so resumption tests can prove a committed stage never reruns.
struct StubExtractor {
    bitmap_page: bool,
    calls: AtomicUsize,
}

impl StubExtractor {
    fn text_native() -> Self {
        Self {
            bitmap_page: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn with_bitmap_page() -> Self {
        Self {
            bitmap_page: true,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Extractor for StubExtractor {
    fn extract(
        &self,
        _bytes: &[u8],
        _format: DocumentFormat,
        filename: &str,
    ) -> Result<Extraction, DocumentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut document = StructuredDocument::new(String::new(), filename);

        if self.bitmap_page {
            let mut page = Page::new(0);
            let mut block = Block::new(block_id(0, 0), BlockKind::Paragraph, "");
            block.metadata.bbox = Some(BoundingBox::new(0.0, 0.0, 100.0, 50.0));
            page.blocks.push(block);
            document.pages.push(page);
            document.metadata.total_pages = 1;
            return Ok(Extraction {
                document,
                bitmaps: vec![PageBitmap {
                    page_index: 0,
                    data: vec![0u8; 16],
                }],
            });
        }

        for page_index in 0..2 {
            let mut page = Page::new(page_index);
            page.blocks
                .push(Block::heading(block_id(page_index, 0), 1, "عنوان"));
            page.blocks.push(Block::new(
                block_id(page_index, 1),
                BlockKind::Paragraph,
                "نص الفقرة",
            ));
            document.pages.push(page);
        }
        document.metadata.total_pages = 2;

        Ok(Extraction {
            document,
            bitmaps: Vec::new(),
        })
    }
}

struct StubRecognizer {
    calls: AtomicUsize,
}

impl StubRecognizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl Recognizer for StubRecognizer {
    fn recognize(&self, regions: &[BitmapRegion]) -> Result<Vec<RegionText>, RecognizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(regions
            .iter()
            .map(|region| RegionText {
                block_id: region.block_id.clone(),
                text: "نص مستخرج".to_string(),
                confidence: 0.92,
                bbox: BoundingBox::new(1.0, 2.0, 90.0, 40.0),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "stub-engine"
    }
}

enum TranslatorMode {
    Translate,
    DropLastBlock,
    UnavailableOnce(AtomicUsize),
}

struct StubTranslator {
    mode: TranslatorMode,
    calls: AtomicUsize,
}

impl StubTranslator {
    fn new(mode: TranslatorMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Translator for StubTranslator {
    fn translate(&self, blocks: &[BlockText]) -> Result<Vec<BlockText>, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.mode {
            TranslatorMode::Translate => Ok(blocks
                .iter()
                .map(|block| BlockText {
                    block_id: block.block_id.clone(),
                    text: format!("translated {}", block.block_id),
                })
                .collect()),
            TranslatorMode::DropLastBlock => {
                let mut output: Vec<BlockText> = blocks
                    .iter()
                    .map(|block| BlockText {
                        block_id: block.block_id.clone(),
                        text: "translated".to_string(),
                    })
                    .collect();
                output.pop();
                Ok(output)
            }
            TranslatorMode::UnavailableOnce(failures) => {
                if failures.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TranslateError::ModelUnavailable {
                        message: "connection refused".to_string(),
                    })
                } else {
                    Ok(blocks.to_vec())
                }
            }
        }
    }
}

struct Harness {
    store: Arc<InMemoryStore>,
    orchestrator: Orchestrator,
    extractor: Arc<StubExtractor>,
    recognizer: Arc<StubRecognizer>,
    job_id: Uuid,
}

fn harness(extractor: StubExtractor, translator: StubTranslator) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let jobs: Arc<dyn JobStore> = store.clone();
    let results: Arc<dyn ResultStore> = store.clone();

    let extractor = Arc::new(extractor);
    let recognizer = Arc::new(StubRecognizer::new());

    let orchestrator = Orchestrator::new(
        jobs,
        results,
        extractor.clone(),
        recognizer.clone(),
        Arc::new(translator),
        32,
    );

    let job = Job::new("report.pdf", DocumentFormat::Pdf, 128, JobOptions::default());
    let job_id = job.job_id;
    store.save(job).unwrap();
    store.save_upload(&job_id, b"%PDF-stub").unwrap();

    Harness {
        store,
        orchestrator,
        extractor,
        recognizer,
        job_id,
    }
}

#[test]
fn test_text_native_job_completes_with_trivial_ocr_stage() {
    let h = harness(
        StubExtractor::text_native(),
        StubTranslator::new(TranslatorMode::Translate),
    );

    h.orchestrator.run(&h.job_id);

    let job = h.store.load(&h.job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.stages.extraction, StageStatus::Completed);
    // The ocr stage is recorded completed even though nothing was recognized.
    assert_eq!(job.stages.ocr, StageStatus::Completed);
    assert_eq!(job.stages.translation, StageStatus::Completed);
    assert_eq!(h.recognizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(job.progress(), 100);
    assert!(job.completed_at.is_some());

    let stats = job.stats.unwrap();
    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.total_blocks, 4);
    assert_eq!(stats.ocr_pages, 0);
    assert!(stats.target_characters.is_some());
}

#[test]
fn test_completed_job_has_identical_block_sets_in_both_languages() {
    let h = harness(
        StubExtractor::text_native(),
        StubTranslator::new(TranslatorMode::Translate),
    );

    h.orchestrator.run(&h.job_id);

    let source = h.store.load_document(&h.job_id, "ar").unwrap();
    let target = h.store.load_document(&h.job_id, "en").unwrap();

    assert_eq!(source.block_ids(), vec!["p0-b0", "p0-b1", "p1-b0", "p1-b1"]);
    assert_eq!(source.block_ids(), target.block_ids());
    assert_eq!(source.document_id, target.document_id);
    assert_eq!(target.language, "en");

    for block in target.blocks() {
        assert_eq!(block.text, format!("translated {}", block.block_id));
    }
    // Block kinds and metadata carry over; a heading stays a heading.
    assert_eq!(target.pages[0].blocks[0].kind, BlockKind::Heading);
}

#[test]
fn test_bitmap_page_is_recognized_and_merged_by_block_id() {
    let h = harness(
        StubExtractor::with_bitmap_page(),
        StubTranslator::new(TranslatorMode::Translate),
    );

    h.orchestrator.run(&h.job_id);

    let job = h.store.load(&h.job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(h.recognizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(job.stats.as_ref().unwrap().ocr_pages, 1);

    let source = h.store.load_document(&h.job_id, "ar").unwrap();
    let block = &source.pages[0].blocks[0];
    assert_eq!(block.block_id, "p0-b0");
    assert_eq!(block.text, "نص مستخرج");
    assert_eq!(block.metadata.confidence, Some(0.92));
    assert!(block.metadata.bbox.is_some());

    // Confidence and geometry do not carry over to the target document.
    let target = h.store.load_document(&h.job_id, "en").unwrap();
    let translated = &target.pages[0].blocks[0];
    assert!(translated.metadata.confidence.is_none());
    assert!(translated.metadata.bbox.is_none());
}

#[test]
fn test_translator_dropping_a_block_fails_the_job_with_mismatch() {
    let h = harness(
        StubExtractor::text_native(),
        StubTranslator::new(TranslatorMode::DropLastBlock),
    );

    h.orchestrator.run(&h.job_id);

    let job = h.store.load(&h.job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.stages.translation, StageStatus::Failed);
    let message = job.error_message.unwrap();
    assert!(message.contains("correspondence mismatch"), "{message}");

    // The committed source document stays retrievable after the failure.
    let source = h.store.load_document(&h.job_id, "ar").unwrap();
    assert_eq!(source.block_count(), 4);
    assert!(h.store.load_document(&h.job_id, "en").is_err());
}

#[test]
fn test_resubmission_resumes_without_rerunning_committed_stages() {
    let h = harness(
        StubExtractor::text_native(),
        StubTranslator::new(TranslatorMode::UnavailableOnce(AtomicUsize::new(0))),
    );

    h.orchestrator.run(&h.job_id);

    let failed = h.store.load(&h.job_id).unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert_eq!(failed.stages.extraction, StageStatus::Completed);
    assert_eq!(failed.stages.translation, StageStatus::Failed);
    assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 1);

    // Re-submission re-enters at translation; extraction is not re-executed.
    h.orchestrator.run(&h.job_id);

    let completed = h.store.load(&h.job_id).unwrap();
    assert_eq!(completed.status, JobStatus::Completed);
    assert!(completed.error_message.is_none());
    assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_completed_job_rerun_is_a_no_op() {
    let h = harness(
        StubExtractor::text_native(),
        StubTranslator::new(TranslatorMode::Translate),
    );

    h.orchestrator.run(&h.job_id);
    h.orchestrator.run(&h.job_id);

    assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 1);
    let job = h.store.load(&h.job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
}
