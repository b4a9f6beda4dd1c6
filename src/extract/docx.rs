//! Word document extraction.
//!
//! Walks the document body, turning paragraphs into paragraph or heading
//! blocks (heading detection via paragraph style) and tables into one
//! `table_cell` block per cell with row/column position. Explicit page
//! breaks split the block stream into pages; a document without any becomes
//! a single page, since `.docx` files carry no fixed pagination.

use docx_rs::{
    Break, BreakType, DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent,
    TableChild, TableRowChild,
};

use crate::document::{block_id, Block, DocumentError, Page, StructuredDocument};
use crate::extract::Extraction;

pub(crate) fn extract(bytes: &[u8], filename: &str) -> Result<Extraction, DocumentError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocumentError::WordLoad {
        message: e.to_string(),
    })?;

    let mut document = StructuredDocument::new(String::new(), filename);
    let mut builder = PageBuilder::default();
    let mut table_count = 0usize;

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                let text = paragraph.raw_text();
                if !text.trim().is_empty() {
                    match heading_level(paragraph) {
                        Some(level) => builder.push(PendingBlock::Heading { level, text }),
                        None => builder.push(PendingBlock::Paragraph { text }),
                    }
                }

                if paragraph_has_page_break(paragraph) && !builder.is_empty() {
                    document.pages.push(builder.finish(document.pages.len()));
                }
            }
            DocumentChild::Table(table) => {
                let table_id = format!("table-{table_count}");
                table_count += 1;

                for (row, row_child) in table.rows.iter().enumerate() {
                    let TableChild::TableRow(table_row) = row_child;
                    for (col, cell_child) in table_row.cells.iter().enumerate() {
                        let TableRowChild::TableCell(cell) = cell_child;
                        let text = table_cell_text(cell);
                        if !text.is_empty() {
                            builder.push(PendingBlock::TableCell {
                                row,
                                col,
                                table_id: table_id.clone(),
                                text,
                            });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if !builder.is_empty() || document.pages.is_empty() {
        document.pages.push(builder.finish(document.pages.len()));
    }

    document.metadata.total_pages = document.pages.len();

    // Word content is always text-native; nothing to recognize.
    Ok(Extraction {
        document,
        bitmaps: Vec::new(),
    })
}

enum PendingBlock {
    Paragraph { text: String },
    Heading { level: u8, text: String },
    TableCell { row: usize, col: usize, table_id: String, text: String },
}

/// Accumulates blocks for the page being built; ids are assigned when the
/// page is finished, so ordinals restart per page.
#[derive(Default)]
struct PageBuilder {
    pending: Vec<PendingBlock>,
}

impl PageBuilder {
    fn push(&mut self, block: PendingBlock) {
        self.pending.push(block);
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn finish(&mut self, page_index: usize) -> Page {
        let mut page = Page::new(page_index);
        for (ordinal, pending) in self.pending.drain(..).enumerate() {
            let id = block_id(page_index, ordinal);
            let block = match pending {
                PendingBlock::Paragraph { text } => {
                    Block::new(id, crate::document::BlockKind::Paragraph, text)
                }
                PendingBlock::Heading { level, text } => Block::heading(id, level, text),
                PendingBlock::TableCell {
                    row,
                    col,
                    table_id,
                    text,
                } => Block::table_cell(id, row, col, table_id, text),
            };
            page.blocks.push(block);
        }
        page
    }
}

/// Checks if a paragraph contains an explicit page break.
fn paragraph_has_page_break(paragraph: &Paragraph) -> bool {
    let page_break = Break::new(BreakType::Page);

    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Break(br) = run_child {
                    if *br == page_break {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Extracts the heading level from a paragraph style named `Heading{n}`.
///
/// The style field is not directly accessible in docx-rs, so the paragraph
/// property is read back through its JSON representation.
fn heading_level(paragraph: &Paragraph) -> Option<u8> {
    let json = serde_json::to_value(&paragraph.property).ok()?;
    let style = json.get("style")?.get("val")?.as_str()?;
    let suffix = style.strip_prefix("Heading")?;
    Some(suffix.trim().parse::<u8>().unwrap_or(1))
}

/// Extracts text content from a table cell, including nested tables.
fn table_cell_text(cell: &docx_rs::TableCell) -> String {
    let mut texts = Vec::new();

    for content in &cell.children {
        match content {
            TableCellContent::Paragraph(p) => {
                let text = p.raw_text();
                if !text.is_empty() {
                    texts.push(text);
                }
            }
            TableCellContent::Table(nested) => {
                for row_child in &nested.rows {
                    let TableChild::TableRow(row) = row_child;
                    for cell_child in &row.cells {
                        let TableRowChild::TableCell(nested_cell) = cell_child;
                        let nested_text = table_cell_text(nested_cell);
                        if !nested_text.is_empty() {
                            texts.push(nested_text);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    texts.join(" ")
}
