//! PDF extraction.
//!
//! Pages with an embedded text layer are split into paragraph blocks
//! directly. Pages without one are rendered to a bitmap, given a single
//! full-page region block, and flagged for recognition; if a region must be
//! subdivided further, that subdivision happens here, never in the
//! recognition stage.
//!
//! Uses the `pdfium-render` crate, which requires the PDFium library to be
//! available at runtime (bundled or system-installed).

use pdfium_render::prelude::*;
use tracing::debug;

use crate::document::{
    block_id, Block, BlockKind, BoundingBox, DocumentError, Page, StructuredDocument,
};
use crate::extract::Extraction;
use crate::store::PageBitmap;

/// Rendering resolution for pages that need recognition.
const RENDER_DPI: f32 = 300.0;

pub(crate) fn extract(bytes: &[u8], filename: &str) -> Result<Extraction, DocumentError> {
    let pdfium = Pdfium::new(
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name())
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|source| DocumentError::PdfLoad { source })?,
    );

    let pdf = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|source| DocumentError::PdfLoad { source })?;

    let total_pages = pdf.pages().len() as usize;
    let render_config = PdfRenderConfig::new().scale_page_by_factor(RENDER_DPI / 72.0);

    let mut document = StructuredDocument::new(String::new(), filename);
    let mut bitmaps = Vec::new();

    for page_index in 0..total_pages {
        let pdf_page = pdf
            .pages()
            .get(page_index as u16)
            .map_err(|source| DocumentError::PdfLoad { source })?;

        let text_page = pdf_page
            .text()
            .map_err(|source| DocumentError::PdfLoad { source })?;

        let page_text = text_page.all();
        let mut page = Page::new(page_index);

        if page_text.trim().is_empty() {
            debug!(page_index, "page has no text layer, flagging for recognition");
            let (data, width, height) = render_page(&pdf_page, &render_config)?;
            let mut block = Block::new(block_id(page_index, 0), BlockKind::Paragraph, "");
            block.metadata.bbox = Some(BoundingBox::new(0.0, 0.0, width as f32, height as f32));
            page.blocks.push(block);
            bitmaps.push(PageBitmap { page_index, data });
        } else {
            for (ordinal, paragraph) in split_paragraphs(&page_text).into_iter().enumerate() {
                page.blocks.push(Block::new(
                    block_id(page_index, ordinal),
                    BlockKind::Paragraph,
                    paragraph,
                ));
            }
        }

        document.pages.push(page);
    }

    document.metadata.total_pages = total_pages;
    debug!(
        total_pages,
        flagged = bitmaps.len(),
        "extracted PDF structure"
    );

    Ok(Extraction { document, bitmaps })
}

/// Groups the text layer's lines into paragraphs: consecutive non-empty
/// lines form one paragraph, blank lines separate paragraphs.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Renders a page to a PNG-encoded bitmap, returning the data and pixel size.
fn render_page(
    page: &PdfPage,
    render_config: &PdfRenderConfig,
) -> Result<(Vec<u8>, u32, u32), DocumentError> {
    let pdf_bitmap = page
        .render_with_config(render_config)
        .map_err(|source| DocumentError::PdfLoad { source })?;

    let width = pdf_bitmap.width() as u32;
    let height = pdf_bitmap.height() as u32;
    let raw_bytes = pdf_bitmap.as_raw_bytes();

    // PDFium renders BGRA; repack into RGB for encoding.
    let stride = width as usize * 4;
    let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let pixel_index = y as usize * stride + x as usize * 4;
            if pixel_index + 2 < raw_bytes.len() {
                let b = raw_bytes[pixel_index];
                let g = raw_bytes[pixel_index + 1];
                let r = raw_bytes[pixel_index + 2];
                rgb_data.push(r);
                rgb_data.push(g);
                rgb_data.push(b);
            }
        }
    }

    let rgb_image = image::RgbImage::from_raw(width, height, rgb_data).ok_or_else(|| {
        DocumentError::Malformed {
            message: format!("rendered page bitmap has inconsistent dimensions {width}x{height}"),
        }
    })?;

    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|source| DocumentError::ImageLoad { source })?;

    Ok((png.into_inner(), width, height))
}
