//! Plain text rendering.

use crate::document::{BlockKind, StructuredDocument};

/// Renders the document as plain text with lightweight structure markers:
/// `#` prefixes for headings by level, `-` list markers indented by list
/// level, and a blank line between pages.
pub(crate) fn render(document: &StructuredDocument) -> String {
    let mut lines = Vec::new();

    for page in &document.pages {
        for block in &page.blocks {
            if block.text.trim().is_empty() {
                continue;
            }

            match block.kind {
                BlockKind::Heading => {
                    let level = usize::from(block.metadata.heading_level.unwrap_or(1));
                    lines.push(format!("{} {}", "#".repeat(level.max(1)), block.text));
                }
                BlockKind::ListItem => {
                    let level = usize::from(block.metadata.list_level.unwrap_or(0));
                    lines.push(format!("{}- {}", "  ".repeat(level), block.text));
                }
                BlockKind::Paragraph | BlockKind::TableCell => {
                    lines.push(block.text.clone());
                }
            }
        }

        lines.push(String::new());
    }

    lines.join("\n")
}
