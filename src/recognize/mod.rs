//! Optical character recognition adapter.
//!
//! Recognition never creates blocks: it receives the bitmap regions that
//! extraction defined (one per flagged block id) and returns text,
//! confidence, and a bounding box to merge back into those same blocks.

pub mod tesseract;

pub use tesseract::TesseractRecognizer;

use thiserror::Error;

use crate::document::BoundingBox;

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("OCR engine unavailable: {engine}")]
    EngineUnavailable { engine: String },

    #[error("OCR engine failed: {message}")]
    Engine { message: String },
}

/// A bitmap region handed to the engine, keyed by the block that owns it.
#[derive(Debug, Clone)]
pub struct BitmapRegion {
    pub block_id: String,
    pub page_index: usize,
    /// PNG-encoded image data.
    pub data: Vec<u8>,
}

/// Recognition result for one region.
#[derive(Debug, Clone)]
pub struct RegionText {
    pub block_id: String,
    pub text: String,
    /// Mean word confidence in `[0, 1]`.
    pub confidence: f32,
    pub bbox: BoundingBox,
}

pub trait Recognizer: Send + Sync {
    fn recognize(&self, regions: &[BitmapRegion]) -> Result<Vec<RegionText>, RecognizeError>;

    /// Engine name recorded in document metadata.
    fn name(&self) -> &str;
}
