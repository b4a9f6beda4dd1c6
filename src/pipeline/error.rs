use thiserror::Error;

use crate::document::DocumentError;
use crate::recognize::RecognizeError;
use crate::store::StoreError;
use crate::translate::TranslateError;

/// Coarse classification of a pipeline failure, used for observability.
///
/// `Defect` means an internal invariant was violated (a bug somewhere in the
/// pipeline or an adapter, never the caller); `UserInput` means the uploaded
/// document itself is the problem; `External` covers collaborators and
/// infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    UserInput,
    Defect,
    External,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::UserInput => write!(f, "input"),
            ErrorClass::Defect => write!(f, "defect"),
            ErrorClass::External => write!(f, "external"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Document {
        #[from]
        source: DocumentError,
    },

    #[error(transparent)]
    Recognize {
        #[from]
        source: RecognizeError,
    },

    #[error(transparent)]
    Translate {
        #[from]
        source: TranslateError,
    },

    #[error(transparent)]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Job exceeded the maximum processing duration of {minutes} minutes")]
    Timeout { minutes: u64 },

    /// The job was terminated (e.g. by the timeout path) while the pipeline
    /// was still running; the remaining stages must not execute.
    #[error("Job was terminated while the pipeline was running")]
    Terminated,
}

impl PipelineError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            PipelineError::Document { source } => match source {
                DocumentError::UnsupportedFormat { .. }
                | DocumentError::PdfLoad { .. }
                | DocumentError::WordLoad { .. }
                | DocumentError::ImageLoad { .. } => ErrorClass::UserInput,
                DocumentError::Malformed { .. }
                | DocumentError::CorrespondenceMismatch { .. } => ErrorClass::Defect,
            },
            PipelineError::Recognize { .. }
            | PipelineError::Translate { .. }
            | PipelineError::Store { .. }
            | PipelineError::Timeout { .. }
            | PipelineError::Terminated => ErrorClass::External,
        }
    }
}
