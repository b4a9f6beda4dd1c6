//! Structured bilingual document model.
//!
//! A [`StructuredDocument`] is the page/block tree representing one
//! language's rendering of a job's content. Every pipeline stage produces or
//! consumes this shape; rendering and export consume it. The model carries no
//! behavior beyond construction helpers and validation.

pub mod block;
pub mod correspondence;
pub mod error;
pub mod format;

pub use block::{block_id, Block, BlockKind, BlockMetadata, BoundingBox, TableCellRef};
pub use correspondence::{BlockPair, CorrespondenceMap};
pub use error::DocumentError;
pub use format::DocumentFormat;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Document-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source_filename: String,
    pub total_pages: usize,
    pub extraction_timestamp: DateTime<Utc>,
    /// Name of the recognition engine used, absent for fully text-native jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_seconds: Option<f64>,
}

/// One page of a structured document.
///
/// `page_index` is 0-based and matches the source document order; validation
/// requires indexes to be contiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub page_index: usize,
    pub blocks: Vec<Block>,
}

impl Page {
    #[must_use]
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            blocks: Vec::new(),
        }
    }
}

/// One language's structured rendering of a job's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub document_id: Uuid,
    /// Language tag, e.g. `"ar"` or `"en"`.
    pub language: String,
    pub metadata: DocumentMetadata,
    pub pages: Vec<Page>,
}

impl StructuredDocument {
    /// Creates an empty document for `language` with a fresh document id.
    #[must_use]
    pub fn new(language: impl Into<String>, source_filename: impl Into<String>) -> Self {
        Self {
            document_id: Uuid::new_v4(),
            language: language.into(),
            metadata: DocumentMetadata {
                source_filename: source_filename.into(),
                total_pages: 0,
                extraction_timestamp: Utc::now(),
                ocr_engine: None,
                processing_seconds: None,
            },
            pages: Vec::new(),
        }
    }

    /// Iterates over all blocks in page order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|page| page.blocks.iter())
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.pages.iter_mut().flat_map(|page| page.blocks.iter_mut())
    }

    #[must_use]
    pub fn find_block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks_mut().find(|block| block.block_id == block_id)
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|page| page.blocks.len()).sum()
    }

    /// Total character count across all block texts.
    #[must_use]
    pub fn character_count(&self) -> usize {
        self.blocks().map(Block::character_count).sum()
    }

    /// All block ids in page/block order.
    #[must_use]
    pub fn block_ids(&self) -> Vec<&str> {
        self.blocks().map(|block| block.block_id.as_str()).collect()
    }

    /// Checks the structural invariants consumers are allowed to assume.
    ///
    /// Fails with [`DocumentError::Malformed`] if any block lacks a
    /// `block_id`, if a `block_id` occurs twice, if `page_index` values are
    /// not contiguous from 0, or if a table cell block has no table position.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for (expected_index, page) in self.pages.iter().enumerate() {
            if page.page_index != expected_index {
                return Err(DocumentError::Malformed {
                    message: format!(
                        "page_index {} at position {expected_index} is not contiguous",
                        page.page_index
                    ),
                });
            }

            for block in &page.blocks {
                if block.block_id.is_empty() {
                    return Err(DocumentError::Malformed {
                        message: format!("block without id on page {}", page.page_index),
                    });
                }
                if !seen.insert(block.block_id.as_str()) {
                    return Err(DocumentError::Malformed {
                        message: format!("duplicate block id {}", block.block_id),
                    });
                }
                if block.kind == BlockKind::TableCell && block.metadata.table.is_none() {
                    return Err(DocumentError::Malformed {
                        message: format!(
                            "table cell block {} has no row/col position",
                            block.block_id
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}
