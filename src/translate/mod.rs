//! Translation adapter.
//!
//! Translation operates per-block: the adapter receives `{block_id, text}`
//! pairs and must return exactly the same set of ids with translated text.
//! Batching several blocks into one model call is an internal optimization
//! of the adapter and never changes that contract; the orchestrator verifies
//! the id set on every batch.

pub mod http;

pub use http::HttpTranslator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Translation model unavailable: {message}")]
    ModelUnavailable { message: String },

    #[error("Translation model failed: {message}")]
    Model { message: String },
}

/// One block's text, keyed by its permanent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockText {
    pub block_id: String,
    pub text: String,
}

pub trait Translator: Send + Sync {
    fn translate(&self, blocks: &[BlockText]) -> Result<Vec<BlockText>, TranslateError>;
}

/// Identity translator for development setups without a model endpoint.
///
/// Returns every block unchanged, which keeps the pipeline exercisable
/// end-to-end while making the "translation" a no-op.
#[derive(Debug, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, blocks: &[BlockText]) -> Result<Vec<BlockText>, TranslateError> {
        Ok(blocks.to_vec())
    }
}
