use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::export::ExportError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Base64 data exceeds maximum allowed size")]
    Base64DataTooLarge,

    #[error("Invalid base64 data: {0}")]
    InvalidBase64(String),

    #[error("File size exceeds maximum allowed size")]
    FileSizeTooLarge,

    #[error("Filename is empty")]
    EmptyFilename,

    #[error("Filename exceeds 255 characters")]
    FilenameTooLong,

    #[error("Filename contains forbidden character: {0:?}")]
    ForbiddenCharacter(char),

    #[error("Filename has no extension")]
    MissingExtension,

    #[error("Filename starts or ends with an invalid character")]
    InvalidFilenameEdges,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request validation failed")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Not found")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Job is not in a retryable state: {status}")]
    NotRetryable { status: String },

    #[error("Failed to render document")]
    Export {
        #[from]
        source: ExportError,
    },

    #[error("Processing queue is unavailable")]
    QueueUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request".to_string(),
                Some(msg),
            ),
            AppError::Validation { source } => (
                StatusCode::BAD_REQUEST,
                "Bad Request".to_string(),
                Some(source.to_string()),
            ),
            AppError::UnsupportedFormat { extension } => (
                StatusCode::BAD_REQUEST,
                "Unsupported File Format".to_string(),
                Some(format!("extension {extension:?} is not supported")),
            ),
            AppError::Store { source } => (
                StatusCode::NOT_FOUND,
                "Not Found".to_string(),
                Some(source.to_string()),
            ),
            AppError::NotRetryable { status } => (
                StatusCode::CONFLICT,
                "Job Not Retryable".to_string(),
                Some(format!("current status: {status}")),
            ),
            AppError::Export { source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Export Error".to_string(),
                Some(source.to_string()),
            ),
            AppError::QueueUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Processing Queue Unavailable".to_string(),
                None,
            ),
        };

        let mut error_response = ErrorResponse::new(error_message);
        if let Some(details) = details {
            error_response = error_response.with_details(details);
        }

        (status, Json(error_response)).into_response()
    }
}
