pub mod document;
pub mod export;
pub mod extract;
pub mod job;
pub mod pipeline;
pub mod recognize;
pub mod server;
pub mod store;
pub mod translate;
pub mod utils;

pub use document::{
    Block, BlockKind, BlockMetadata, BoundingBox, CorrespondenceMap, DocumentError,
    DocumentFormat, Page, StructuredDocument,
};
pub use job::{derive_status, progress_percent, Job, JobStatus, Stage, StageStatus};
pub use pipeline::{ErrorClass, Orchestrator, PipelineError};
pub use server::{create_app, start_server};
pub use store::{InMemoryStore, JobStore, ResultStore};
