//! Word document rendering.
//!
//! Rebuilds a `.docx` from the block tree: headings map to heading styles,
//! list items and table cells to indented paragraphs, and page boundaries to
//! explicit page breaks. Right-to-left source languages are right-aligned.

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};

use crate::document::{BlockKind, StructuredDocument};
use crate::export::ExportError;

/// Indentation step in twips (1/20 point); 720 is half an inch.
const INDENT_STEP: i32 = 720;

pub(crate) fn render(document: &StructuredDocument) -> Result<Vec<u8>, ExportError> {
    let right_to_left = matches!(document.language.as_str(), "ar" | "fa" | "he" | "ur");
    let mut docx = Docx::new();

    let last_page_index = document.pages.len().saturating_sub(1);
    for page in &document.pages {
        for block in &page.blocks {
            if block.text.trim().is_empty() {
                continue;
            }

            let mut paragraph = Paragraph::new().add_run(Run::new().add_text(block.text.as_str()));

            match block.kind {
                BlockKind::Heading => {
                    let level = block.metadata.heading_level.unwrap_or(1).clamp(1, 6);
                    paragraph = paragraph.style(&format!("Heading{level}"));
                }
                BlockKind::ListItem => {
                    let level = i32::from(block.metadata.list_level.unwrap_or(0));
                    paragraph = paragraph.indent(Some((level + 1) * INDENT_STEP), None, None, None);
                }
                BlockKind::TableCell => {
                    if let Some(table) = &block.metadata.table {
                        paragraph = paragraph.indent(
                            Some(table.col as i32 * INDENT_STEP),
                            None,
                            None,
                            None,
                        );
                    }
                }
                BlockKind::Paragraph => {}
            }

            if right_to_left {
                paragraph = paragraph.align(AlignmentType::Right);
            }

            docx = docx.add_paragraph(paragraph);
        }

        if page.page_index < last_page_index {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx {
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}
