//! Block types for structured documents.
//!
//! A [`Block`] is the atomic correspondence unit of a document: it is created
//! exactly once during extraction, keeps its `block_id` for the rest of the
//! job's lifetime, and is what the source-language and target-language
//! renderings of a document are paired on.

use serde::{Deserialize, Serialize};

/// The structural role of a block within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A run of body text.
    Paragraph,
    /// A heading, with an optional level in the block metadata.
    Heading,
    /// An item of a bulleted or numbered list.
    ListItem,
    /// A single cell of a table, positioned by `row`/`col` metadata.
    TableCell,
}

/// Axis-aligned bounding box in page pixel coordinates.
///
/// Present only on blocks derived from a bitmap region (rendered PDF pages
/// or uploaded images); text-native blocks carry no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// Table position of a `TableCell` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCellRef {
    pub row: usize,
    pub col: usize,
    pub table_id: String,
}

/// Per-block metadata.
///
/// `confidence` is populated only for blocks whose text passed through
/// recognition; `bbox` only for blocks derived from a bitmap region. Neither
/// carries over to the target-language copy of the block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub is_heading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableCellRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// A single content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Permanent identity, assigned at extraction and never regenerated.
    pub block_id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
    #[serde(default)]
    pub metadata: BlockMetadata,
}

impl Block {
    #[must_use]
    pub fn new(block_id: impl Into<String>, kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            kind,
            text: text.into(),
            metadata: BlockMetadata::default(),
        }
    }

    /// Creates a heading block with `is_heading` and `heading_level` set.
    #[must_use]
    pub fn heading(block_id: impl Into<String>, level: u8, text: impl Into<String>) -> Self {
        let mut block = Self::new(block_id, BlockKind::Heading, text);
        block.metadata.is_heading = true;
        block.metadata.heading_level = Some(level);
        block
    }

    /// Creates a table cell block positioned at `row`/`col` of `table_id`.
    #[must_use]
    pub fn table_cell(
        block_id: impl Into<String>,
        row: usize,
        col: usize,
        table_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let mut block = Self::new(block_id, BlockKind::TableCell, text);
        block.metadata.table = Some(TableCellRef {
            row,
            col,
            table_id: table_id.into(),
        });
        block
    }

    #[must_use]
    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Canonical block id for the `ordinal`-th block of page `page_index`.
///
/// Ids are assigned once, during extraction, in page order.
#[must_use]
pub fn block_id(page_index: usize, ordinal: usize) -> String {
    format!("p{page_index}-b{ordinal}")
}
