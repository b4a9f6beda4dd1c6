//! Image extraction.
//!
//! An uploaded image is a single bitmap page with no text layer: extraction
//! creates one full-page region block and flags the page for recognition.

use crate::document::{
    block_id, Block, BlockKind, BoundingBox, DocumentError, Page, StructuredDocument,
};
use crate::extract::Extraction;
use crate::store::PageBitmap;

pub(crate) fn extract(bytes: &[u8], filename: &str) -> Result<Extraction, DocumentError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|source| DocumentError::ImageLoad { source })?;

    let width = decoded.width();
    let height = decoded.height();

    let mut png = std::io::Cursor::new(Vec::new());
    decoded
        .to_rgb8()
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|source| DocumentError::ImageLoad { source })?;

    let mut document = StructuredDocument::new(String::new(), filename);
    let mut page = Page::new(0);

    let mut block = Block::new(block_id(0, 0), BlockKind::Paragraph, "");
    block.metadata.bbox = Some(BoundingBox::new(0.0, 0.0, width as f32, height as f32));
    page.blocks.push(block);

    document.pages.push(page);
    document.metadata.total_pages = 1;

    Ok(Extraction {
        document,
        bitmaps: vec![PageBitmap {
            page_index: 0,
            data: png.into_inner(),
        }],
    })
}
