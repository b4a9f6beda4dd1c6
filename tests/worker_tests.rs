use std::sync::Arc;
use std::time::Duration;

use linguadoc::document::{
    block_id, Block, BlockKind, DocumentError, DocumentFormat, Page, StructuredDocument,
};
use linguadoc::extract::{Extraction, Extractor};
use linguadoc::job::{Job, JobOptions, JobStatus};
use linguadoc::pipeline::{job_queue, Orchestrator, WorkerPool};
use linguadoc::recognize::{BitmapRegion, RecognizeError, Recognizer, RegionText};
use linguadoc::store::{InMemoryStore, JobStore, ResultStore};
use linguadoc::translate::{BlockText, PassthroughTranslator, TranslateError, Translator};
use uuid::Uuid;

struct OnePageExtractor;

impl Extractor for OnePageExtractor {
    fn extract(
        &self,
        _bytes: &[u8],
        _format: DocumentFormat,
        filename: &str,
    ) -> Result<Extraction, DocumentError> {
        let mut document = StructuredDocument::new(String::new(), filename);
        let mut page = Page::new(0);
        page.blocks
            .push(Block::new(block_id(0, 0), BlockKind::Paragraph, "نص"));
        document.pages.push(page);
        document.metadata.total_pages = 1;
        Ok(Extraction {
            document,
            bitmaps: Vec::new(),
        })
    }
}

struct UnusedRecognizer;

impl Recognizer for UnusedRecognizer {
    fn recognize(&self, _regions: &[BitmapRegion]) -> Result<Vec<RegionText>, RecognizeError> {
        panic!("recognizer must not be invoked for text-native jobs");
    }

    fn name(&self) -> &str {
        "unused"
    }
}

/// Translator that blocks long enough for the pool timeout to fire.
struct SlowTranslator {
    delay: Duration,
}

impl Translator for SlowTranslator {
    fn translate(&self, blocks: &[BlockText]) -> Result<Vec<BlockText>, TranslateError> {
        std::thread::sleep(self.delay);
        Ok(blocks.to_vec())
    }
}

fn setup(
    translator: Arc<dyn Translator>,
) -> (Arc<InMemoryStore>, Arc<Orchestrator>, Uuid) {
    let store = Arc::new(InMemoryStore::new());
    let jobs: Arc<dyn JobStore> = store.clone();
    let results: Arc<dyn ResultStore> = store.clone();

    let orchestrator = Arc::new(Orchestrator::new(
        jobs,
        results,
        Arc::new(OnePageExtractor),
        Arc::new(UnusedRecognizer),
        translator,
        32,
    ));

    let job = Job::new("doc.pdf", DocumentFormat::Pdf, 16, JobOptions::default());
    let job_id = job.job_id;
    store.save(job).unwrap();
    store.save_upload(&job_id, b"%PDF-stub").unwrap();

    (store, orchestrator, job_id)
}

async fn wait_for_terminal(store: &InMemoryStore, job_id: &Uuid) -> Job {
    for _ in 0..200 {
        let job = store.load(job_id).unwrap();
        if job.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job did not reach a terminal state in time");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_pool_processes_queued_job() {
    let (store, orchestrator, job_id) = setup(Arc::new(PassthroughTranslator));
    let jobs: Arc<dyn JobStore> = store.clone();

    let (queue, receiver) = job_queue();
    let pool = WorkerPool::spawn(
        2,
        receiver,
        orchestrator,
        jobs,
        Duration::from_secs(30),
    );

    assert!(queue.submit(job_id));

    let job = wait_for_terminal(&store, &job_id).await;
    assert_eq!(job.status, JobStatus::Completed);

    pool.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_job_exceeding_timeout_is_forcibly_failed() {
    let (store, orchestrator, job_id) = setup(Arc::new(SlowTranslator {
        delay: Duration::from_millis(500),
    }));
    let jobs: Arc<dyn JobStore> = store.clone();

    let (queue, receiver) = job_queue();
    let pool = WorkerPool::spawn(
        1,
        receiver,
        orchestrator,
        jobs,
        Duration::from_millis(100),
    );

    assert!(queue.submit(job_id));

    let job = wait_for_terminal(&store, &job_id).await;
    assert_eq!(job.status, JobStatus::Failed);
    let message = job.error_message.unwrap();
    assert!(message.contains("maximum processing duration"), "{message}");

    // Output committed before the timeout stays available.
    let source = store.load_document(&job_id, "ar").unwrap();
    assert_eq!(source.block_count(), 1);

    // The abandoned pipeline call cannot resurrect the job.
    tokio::time::sleep(Duration::from_millis(600)).await;
    let job = store.load(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);

    pool.abort();
}
