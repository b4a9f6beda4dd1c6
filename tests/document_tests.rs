use linguadoc::document::{
    block_id, Block, BlockKind, DocumentFormat, DocumentError, Page, StructuredDocument,
};

fn document_with_pages(pages: Vec<Page>) -> StructuredDocument {
    let mut doc = StructuredDocument::new("ar", "test.pdf");
    doc.metadata.total_pages = pages.len();
    doc.pages = pages;
    doc
}

#[test]
fn test_format_detection() {
    assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
    assert_eq!(DocumentFormat::from_extension("docx"), Some(DocumentFormat::Docx));
    assert_eq!(DocumentFormat::from_extension("jpg"), Some(DocumentFormat::Jpeg));
    assert_eq!(DocumentFormat::from_extension("jpeg"), Some(DocumentFormat::Jpeg));
    assert_eq!(DocumentFormat::from_extension("tif"), Some(DocumentFormat::Tiff));
    assert_eq!(DocumentFormat::from_extension("exe"), None);
}

#[test]
fn test_format_detection_case_insensitive() {
    assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
    assert_eq!(DocumentFormat::from_filename("scan.PNG"), Some(DocumentFormat::Png));
}

#[test]
fn test_format_detection_from_filename() {
    assert_eq!(
        DocumentFormat::from_filename("report.final.docx"),
        Some(DocumentFormat::Docx)
    );
    assert_eq!(DocumentFormat::from_filename("no_extension"), None);
}

#[test]
fn test_bitmap_formats() {
    assert!(DocumentFormat::Png.is_bitmap());
    assert!(DocumentFormat::Jpeg.is_bitmap());
    assert!(DocumentFormat::Tiff.is_bitmap());
    assert!(!DocumentFormat::Pdf.is_bitmap());
    assert!(!DocumentFormat::Docx.is_bitmap());
}

#[test]
fn test_block_id_scheme() {
    assert_eq!(block_id(0, 0), "p0-b0");
    assert_eq!(block_id(3, 12), "p3-b12");
}

#[test]
fn test_validate_accepts_well_formed_document() {
    let mut page0 = Page::new(0);
    page0.blocks.push(Block::heading(block_id(0, 0), 1, "Title"));
    page0.blocks.push(Block::new(block_id(0, 1), BlockKind::Paragraph, "Body"));
    let mut page1 = Page::new(1);
    page1
        .blocks
        .push(Block::table_cell(block_id(1, 0), 0, 0, "table-0", "Cell"));

    let doc = document_with_pages(vec![page0, page1]);
    assert!(doc.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_block_id() {
    let mut page = Page::new(0);
    page.blocks.push(Block::new("", BlockKind::Paragraph, "Body"));

    let doc = document_with_pages(vec![page]);
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::Malformed { .. })
    ));
}

#[test]
fn test_validate_rejects_duplicate_block_id() {
    let mut page = Page::new(0);
    page.blocks.push(Block::new("p0-b0", BlockKind::Paragraph, "One"));
    page.blocks.push(Block::new("p0-b0", BlockKind::Paragraph, "Two"));

    let doc = document_with_pages(vec![page]);
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::Malformed { .. })
    ));
}

#[test]
fn test_validate_rejects_non_contiguous_pages() {
    let doc = document_with_pages(vec![Page::new(0), Page::new(2)]);
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::Malformed { .. })
    ));
}

#[test]
fn test_validate_rejects_table_cell_without_position() {
    let mut page = Page::new(0);
    page.blocks
        .push(Block::new("p0-b0", BlockKind::TableCell, "Cell"));

    let doc = document_with_pages(vec![page]);
    assert!(matches!(
        doc.validate(),
        Err(DocumentError::Malformed { .. })
    ));
}

#[test]
fn test_block_and_character_counts() {
    let mut page0 = Page::new(0);
    page0.blocks.push(Block::new("p0-b0", BlockKind::Paragraph, "abc"));
    let mut page1 = Page::new(1);
    page1.blocks.push(Block::new("p1-b0", BlockKind::Paragraph, "defgh"));

    let doc = document_with_pages(vec![page0, page1]);
    assert_eq!(doc.block_count(), 2);
    assert_eq!(doc.character_count(), 8);
    assert_eq!(doc.block_ids(), vec!["p0-b0", "p1-b0"]);
}

#[test]
fn test_block_serialization_uses_type_field() {
    let block = Block::heading("p0-b0", 2, "Title");
    let json = serde_json::to_value(&block).unwrap();

    assert_eq!(json["type"], "heading");
    assert_eq!(json["metadata"]["heading_level"], 2);
    assert_eq!(json["metadata"]["is_heading"], true);
    // Absent optional metadata is omitted entirely.
    assert!(json["metadata"].get("confidence").is_none());
    assert!(json["metadata"].get("bbox").is_none());
}
