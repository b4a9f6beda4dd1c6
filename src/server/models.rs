use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;
use crate::document::StructuredDocument;
use crate::job::{Job, JobOptions, JobStats, JobStatus, StageStatuses};
use crate::utils::AppConfig;

/// Base64 encoding expands data by ~4/3; the decoded-size limit from the
/// configuration is translated into an encoded-length limit up front.
fn max_base64_length(max_file_size: u64) -> usize {
    (max_file_size as usize / 3 + 1) * 4
}

const FORBIDDEN_FILENAME_CHARS: &[char] = &['/', '\0'];

/// Job creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    /// Base64-encoded document data
    pub data: String,

    /// Filename with extension
    pub filename: String,

    /// Source language tag; defaults from configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,

    /// Target language tag; defaults from configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,

    /// Recognition engine override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_engine: Option<String>,

    /// Translation model override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_model: Option<String>,
}

impl CreateJobRequest {
    pub fn validate_and_decode(&self, config: &AppConfig) -> Result<Vec<u8>, ValidationError> {
        self.validate_filename()?;
        self.validate_and_decode_base64(config)
    }

    fn validate_and_decode_base64(&self, config: &AppConfig) -> Result<Vec<u8>, ValidationError> {
        if self.data.len() > max_base64_length(config.max_file_size) {
            return Err(ValidationError::Base64DataTooLarge);
        }

        let decoded = STANDARD
            .decode(&self.data)
            .map_err(|e| ValidationError::InvalidBase64(e.to_string()))?;

        if decoded.len() as u64 > config.max_file_size {
            return Err(ValidationError::FileSizeTooLarge);
        }

        Ok(decoded)
    }

    fn validate_filename(&self) -> Result<(), ValidationError> {
        let filename = self.filename.trim();

        if filename.is_empty() {
            return Err(ValidationError::EmptyFilename);
        }

        if filename.len() > 255 {
            return Err(ValidationError::FilenameTooLong);
        }

        for ch in filename.chars() {
            if FORBIDDEN_FILENAME_CHARS.contains(&ch) {
                return Err(ValidationError::ForbiddenCharacter(ch));
            }
        }

        if !filename.contains('.') || filename.ends_with('.') {
            return Err(ValidationError::MissingExtension);
        }

        if filename.starts_with('.') || filename.starts_with(' ') || filename.ends_with(' ') {
            return Err(ValidationError::InvalidFilenameEdges);
        }

        Ok(())
    }

    pub fn sanitized_filename(&self) -> String {
        self.filename.trim().to_string()
    }

    /// Resolves the job options from the request, falling back to the
    /// configured defaults.
    pub fn job_options(&self, config: &AppConfig) -> JobOptions {
        JobOptions {
            source_language: self
                .source_language
                .clone()
                .unwrap_or_else(|| config.source_language.to_string()),
            target_language: self
                .target_language
                .clone()
                .unwrap_or_else(|| config.target_language.to_string()),
            ocr_engine: self
                .ocr_engine
                .clone()
                .unwrap_or_else(|| config.ocr_engine.to_string()),
            translation_model: self
                .translation_model
                .clone()
                .unwrap_or_else(|| config.translation_model.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Job> for CreateJobResponse {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            created_at: job.created_at,
        }
    }
}

/// Job snapshot served to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    /// Reported percent complete; below 100 until the job is terminal
    /// completed.
    pub progress: u8,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_stages: StageStatuses,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<JobStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            progress: job.progress(),
            original_filename: job.original_filename.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
            processing_stages: job.stages,
            stats: job.stats.clone(),
            error_message: job.error_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobResponse>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Both language documents where available. Either may be absent for a job
/// that failed partway; whatever was committed stays retrievable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultResponse {
    pub job_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<StructuredDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<StructuredDocument>,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ocr_engine: String,
    pub translation: String,
}

impl HealthResponse {
    pub fn new(ocr_engine_available: bool, translation_configured: bool) -> Self {
        Self {
            status: if ocr_engine_available {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            ocr_engine: if ocr_engine_available {
                "available".to_string()
            } else {
                "unavailable".to_string()
            },
            translation: if translation_configured {
                "configured".to_string()
            } else {
                "passthrough".to_string()
            },
        }
    }
}
