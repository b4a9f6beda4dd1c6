use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to load PDF content")]
    PdfLoad {
        #[source]
        source: pdfium_render::prelude::PdfiumError,
    },

    #[error("Failed to load Word document content: {message}")]
    WordLoad { message: String },

    #[error("Failed to load image content")]
    ImageLoad {
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed document: {message}")]
    Malformed { message: String },

    #[error(
        "Block correspondence mismatch: {} missing, {} unexpected ({})",
        .missing.len(),
        .unexpected.len(),
        describe_mismatch(.missing, .unexpected)
    )]
    CorrespondenceMismatch {
        /// Block ids present in the source document but absent from the target.
        missing: Vec<String>,
        /// Block ids present in the target document but never created by extraction.
        unexpected: Vec<String>,
    },
}

impl From<pdfium_render::prelude::PdfiumError> for DocumentError {
    fn from(source: pdfium_render::prelude::PdfiumError) -> Self {
        DocumentError::PdfLoad { source }
    }
}

/// Lists a handful of offending ids so the error message stays bounded.
fn describe_mismatch(missing: &[String], unexpected: &[String]) -> String {
    const SHOWN: usize = 4;
    let mut parts = Vec::new();
    if !missing.is_empty() {
        let ids: Vec<&str> = missing.iter().take(SHOWN).map(String::as_str).collect();
        parts.push(format!("missing: {}", ids.join(", ")));
    }
    if !unexpected.is_empty() {
        let ids: Vec<&str> = unexpected.iter().take(SHOWN).map(String::as_str).collect();
        parts.push(format!("unexpected: {}", ids.join(", ")));
    }
    if parts.is_empty() {
        parts.push("ordering diverges".to_string());
    }
    parts.join("; ")
}
