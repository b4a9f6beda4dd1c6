use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::error::AppError;
use super::models::{
    CreateJobRequest, CreateJobResponse, HealthResponse, JobListResponse, JobResponse,
    JobResultResponse,
};
use super::AppState;
use crate::document::DocumentFormat;
use crate::export::{self, ExportFormat};
use crate::job::{Job, JobStatus};
use crate::recognize::TesseractRecognizer;
use crate::utils::AppConfig;

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    let config = AppConfig::get();
    let engine_available = TesseractRecognizer::available(&config.ocr_engine);
    let translation_configured = config.translation_endpoint.is_some();
    Json(HealthResponse::new(engine_available, translation_configured))
}

/// Creates a job from an uploaded document and enqueues it for processing.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    info!("Received job creation request for filename: {}", request.filename);

    let config = AppConfig::get();
    let bytes = request.validate_and_decode(config)?;
    let filename = request.sanitized_filename();

    let format = DocumentFormat::from_filename(&filename).ok_or_else(|| {
        let extension = std::path::Path::new(&filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("(no extension)")
            .to_string();
        AppError::UnsupportedFormat { extension }
    })?;

    let job = Job::new(
        filename,
        format,
        bytes.len() as u64,
        request.job_options(config),
    );
    let job_id = job.job_id;

    state.jobs.save(job.clone())?;
    state.results.save_upload(&job_id, &bytes)?;

    if !state.queue.submit(job_id) {
        state.jobs.update(&job_id, &mut |job| {
            job.fail_in_progress("failed to enqueue processing task");
        })?;
        return Err(AppError::QueueUnavailable);
    }

    info!("Job {job_id} queued for processing");
    Ok((StatusCode::CREATED, Json(CreateJobResponse::from(&job))))
}

/// Job status endpoint for polling clients.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.jobs.load(&job_id)?;
    Ok(Json(JobResponse::from(&job)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    pub status: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

/// Lists jobs, newest first, with pagination and an optional status filter.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let status_filter = match params.status.as_deref() {
        Some(name) => Some(
            parse_status(name)
                .ok_or_else(|| AppError::BadRequest(format!("invalid status: {name}")))?,
        ),
        None => None,
    };

    let page = params.page.max(1);
    let page_size = params.page_size.clamp(1, 100);

    let jobs: Vec<Job> = state
        .jobs
        .list()?
        .into_iter()
        .filter(|job| status_filter.map_or(true, |status| job.status == status))
        .collect();

    let total = jobs.len();
    let responses: Vec<JobResponse> = jobs
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(JobResponse::from)
        .collect();

    Ok(Json(JobListResponse {
        jobs: responses,
        total,
        page,
        page_size,
    }))
}

/// Re-enqueues a failed job; the pipeline resumes at the first stage whose
/// output is not yet committed.
pub async fn retry_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let job = state.jobs.load(&job_id)?;

    if job.status != JobStatus::Failed {
        return Err(AppError::NotRetryable {
            status: format!("{:?}", job.status).to_lowercase(),
        });
    }

    if !state.queue.submit(job_id) {
        return Err(AppError::QueueUnavailable);
    }

    info!("Job {job_id} re-queued for processing");
    Ok((StatusCode::ACCEPTED, Json(JobResponse::from(&job))))
}

/// Returns both language documents where available. Documents committed by
/// completed stages stay retrievable even after a later stage failed.
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResultResponse>, AppError> {
    let job = state.jobs.load(&job_id)?;

    let source = state
        .results
        .load_document(&job_id, &job.options.source_language)
        .ok();
    let target = state
        .results
        .load_document(&job_id, &job.options.target_language)
        .ok();

    Ok(Json(JobResultResponse {
        job_id,
        source,
        target,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub language: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// Renders one language's document in the requested format.
pub async fn download(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, AppError> {
    let format = ExportFormat::from_name(&params.format)
        .ok_or_else(|| AppError::BadRequest(format!("invalid format: {}", params.format)))?;

    let job = state.jobs.load(&job_id)?;
    let document = state.results.load_document(&job_id, &params.language)?;
    let bytes = export::render(&document, format)?;

    let filename = format!(
        "{}_{}.{}",
        job.original_filename,
        params.language,
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Deletes a job and everything stored for it.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.jobs.delete(&job_id)?;
    state.results.delete(&job_id);
    info!("Job {job_id} deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_status(name: &str) -> Option<JobStatus> {
    match name {
        "queued" => Some(JobStatus::Queued),
        "extracting" => Some(JobStatus::Extracting),
        "ocr" => Some(JobStatus::Ocr),
        "translating" => Some(JobStatus::Translating),
        "completed" => Some(JobStatus::Completed),
        "failed" => Some(JobStatus::Failed),
        _ => None,
    }
}
