//! Export rendering for the download endpoint.
//!
//! Renders one language's structured document to bytes in the requested
//! format. Rendering reads the block tree only; it never mutates stored
//! results.

mod docx;
mod txt;

use thiserror::Error;

use crate::document::StructuredDocument;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize document")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to build Word document: {message}")]
    Docx { message: String },
}

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Txt,
    Docx,
}

impl ExportFormat {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "txt" => Some(ExportFormat::Txt),
            "docx" => Some(ExportFormat::Docx),
            _ => None,
        }
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
        }
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Renders a document to bytes in the requested format.
pub fn render(
    document: &StructuredDocument,
    format: ExportFormat,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(document)?),
        ExportFormat::Txt => Ok(txt::render(document).into_bytes()),
        ExportFormat::Docx => docx::render(document),
    }
}
