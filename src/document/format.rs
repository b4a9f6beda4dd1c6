use serde::{Deserialize, Serialize};

/// Supported upload file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format file (`.pdf`).
    Pdf,
    /// Microsoft Word document (`.docx`).
    Docx,
    /// PNG image file (`.png`).
    Png,
    /// JPEG image file (`.jpg`, `.jpeg`).
    Jpeg,
    /// TIFF image file (`.tiff`, `.tif`).
    Tiff,
}

impl DocumentFormat {
    /// Creates a `DocumentFormat` from a file extension string.
    ///
    /// # Arguments
    ///
    /// * `ext` - The file extension without the leading dot (e.g., "pdf").
    ///
    /// # Returns
    ///
    /// `Some(DocumentFormat)` if the extension is recognized, `None` otherwise.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::supported_formats()
            .into_iter()
            .find(|(supported_ext, _)| supported_ext.eq_ignore_ascii_case(ext))
            .map(|(_, format)| format)
    }

    /// Creates a `DocumentFormat` from a filename's extension.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;
        Self::from_extension(extension)
    }

    /// Returns all supported file extensions with their corresponding formats,
    /// including aliases (both "jpg" and "jpeg", both "tiff" and "tif").
    #[must_use]
    pub fn supported_formats() -> Vec<(&'static str, DocumentFormat)> {
        vec![
            ("pdf", DocumentFormat::Pdf),
            ("docx", DocumentFormat::Docx),
            ("png", DocumentFormat::Png),
            ("jpg", DocumentFormat::Jpeg),
            ("jpeg", DocumentFormat::Jpeg),
            ("tiff", DocumentFormat::Tiff),
            ("tif", DocumentFormat::Tiff),
        ]
    }

    /// Returns the canonical (preferred) file extension for this format.
    #[must_use]
    pub fn canonical_extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Png => "png",
            DocumentFormat::Jpeg => "jpg",
            DocumentFormat::Tiff => "tiff",
        }
    }

    /// `true` for formats whose content is a bitmap with no text layer,
    /// meaning every page must go through recognition.
    #[must_use]
    pub fn is_bitmap(&self) -> bool {
        matches!(
            self,
            DocumentFormat::Png | DocumentFormat::Jpeg | DocumentFormat::Tiff
        )
    }
}
