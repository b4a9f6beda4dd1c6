//! Structural extraction adapter.
//!
//! Extraction is the only stage allowed to create blocks: it turns raw
//! uploaded bytes into a [`StructuredDocument`] whose blocks carry freshly
//! assigned, permanent ids, and flags the pages that have no text layer and
//! therefore need recognition. Later stages merge into or copy these blocks,
//! never invent new ones.

mod docx;
mod image;
mod pdf;

use crate::document::{DocumentError, DocumentFormat, StructuredDocument};
use crate::store::PageBitmap;

/// Output of the extraction stage.
pub struct Extraction {
    pub document: StructuredDocument,
    /// Rendered bitmaps of the pages needing recognition; empty for a fully
    /// text-native document.
    pub bitmaps: Vec<PageBitmap>,
}

impl Extraction {
    /// Page indexes flagged as needing recognition.
    #[must_use]
    pub fn ocr_pages(&self) -> Vec<usize> {
        self.bitmaps.iter().map(|bitmap| bitmap.page_index).collect()
    }
}

/// Turns uploaded bytes into a structured document.
pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
        filename: &str,
    ) -> Result<Extraction, DocumentError>;
}

/// Default extractor dispatching on the detected format.
#[derive(Debug, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for DocumentExtractor {
    fn extract(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
        filename: &str,
    ) -> Result<Extraction, DocumentError> {
        match format {
            DocumentFormat::Pdf => pdf::extract(bytes, filename),
            DocumentFormat::Docx => docx::extract(bytes, filename),
            DocumentFormat::Png | DocumentFormat::Jpeg | DocumentFormat::Tiff => {
                image::extract(bytes, filename)
            }
        }
    }
}
