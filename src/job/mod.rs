//! Job lifecycle model.
//!
//! A [`Job`] tracks one processing request through the three pipeline stages.
//! The job-level [`JobStatus`] is never stored independently: it is a pure
//! projection of the per-stage [`StageStatuses`] (see [`derive_status`]),
//! recomputed after every stage mutation, so the two can never diverge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::DocumentFormat;

/// An independently-tracked pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    Ocr,
    Translation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extraction => write!(f, "extraction"),
            Stage::Ocr => write!(f, "ocr"),
            Stage::Translation => write!(f, "translation"),
        }
    }
}

/// Status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Per-stage status record for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatuses {
    pub extraction: StageStatus,
    pub ocr: StageStatus,
    pub translation: StageStatus,
}

impl Default for StageStatuses {
    fn default() -> Self {
        Self {
            extraction: StageStatus::Pending,
            ocr: StageStatus::Pending,
            translation: StageStatus::Pending,
        }
    }
}

impl StageStatuses {
    #[must_use]
    pub fn get(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Extraction => self.extraction,
            Stage::Ocr => self.ocr,
            Stage::Translation => self.translation,
        }
    }

    pub fn set(&mut self, stage: Stage, status: StageStatus) {
        match stage {
            Stage::Extraction => self.extraction = status,
            Stage::Ocr => self.ocr = status,
            Stage::Translation => self.translation = status,
        }
    }

    /// The stage currently failed or in progress, if any, preferring the
    /// earliest. Used to attribute a forcible failure (e.g. a timeout) to the
    /// stage that was running.
    #[must_use]
    pub fn active(&self) -> Option<Stage> {
        [Stage::Extraction, Stage::Ocr, Stage::Translation]
            .into_iter()
            .find(|stage| {
                matches!(
                    self.get(*stage),
                    StageStatus::InProgress | StageStatus::Pending
                )
            })
    }
}

/// Job-level status, projected from the stage statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Extracting,
    Ocr,
    Translating,
    Completed,
    Failed,
}

/// Projects the job-level status from the per-stage statuses.
///
/// Any failed stage fails the job; all stages completed completes it;
/// otherwise the job reports the earliest stage that is still open, with the
/// special case that an untouched extraction stage reads as `Queued`.
#[must_use]
pub fn derive_status(stages: &StageStatuses) -> JobStatus {
    let all = [stages.extraction, stages.ocr, stages.translation];
    if all.contains(&StageStatus::Failed) {
        return JobStatus::Failed;
    }
    if all.iter().all(|status| *status == StageStatus::Completed) {
        return JobStatus::Completed;
    }
    match stages.extraction {
        StageStatus::Pending => JobStatus::Queued,
        StageStatus::InProgress => JobStatus::Extracting,
        _ => match stages.ocr {
            StageStatus::Pending | StageStatus::InProgress => JobStatus::Ocr,
            _ => JobStatus::Translating,
        },
    }
}

/// Share of total progress contributed by one completed stage.
const STAGE_SHARE: u8 = 33;
/// Share contributed by a stage that has started but not finished.
const IN_PROGRESS_SHARE: u8 = 10;

/// Reported progress for polling clients, in percent.
///
/// Each stage is weighted equally; an in-progress stage contributes a small
/// fraction of its share. The total is capped at 99 until the projection is
/// `Completed`, so a client can never infer completion before terminal
/// persistence. Monotonically non-decreasing over a job's lifetime.
#[must_use]
pub fn progress_percent(stages: &StageStatuses) -> u8 {
    if derive_status(stages) == JobStatus::Completed {
        return 100;
    }
    let mut total = 0u8;
    for status in [stages.extraction, stages.ocr, stages.translation] {
        total += match status {
            StageStatus::Completed => STAGE_SHARE,
            // A failed stage keeps the share it held while running, so the
            // reported value never moves backwards on failure.
            StageStatus::InProgress | StageStatus::Failed => IN_PROGRESS_SHARE,
            StageStatus::Pending => 0,
        };
    }
    total.min(99)
}

/// Aggregate counts, populated incrementally as stages complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total_pages: usize,
    pub total_blocks: usize,
    pub source_characters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_characters: Option<usize>,
    /// Pages that actually went through recognition. Zero for a fully
    /// text-native job, where the ocr stage completes trivially.
    pub ocr_pages: usize,
}

/// Per-job processing options, recorded at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOptions {
    pub source_language: String,
    pub target_language: String,
    pub ocr_engine: String,
    pub translation_model: String,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            source_language: "ar".to_string(),
            target_language: "en".to_string(),
            ocr_engine: "tesseract".to_string(),
            translation_model: "remote".to_string(),
        }
    }
}

/// One processing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub stages: StageStatuses,
    pub original_filename: String,
    pub format: DocumentFormat,
    pub file_size: u64,
    pub options: JobOptions,
    /// Page indexes flagged by extraction as needing recognition; persisted
    /// so a resumed job re-enters recognition without re-running extraction.
    #[serde(default)]
    pub ocr_pages: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<JobStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    #[must_use]
    pub fn new(
        original_filename: impl Into<String>,
        format: DocumentFormat,
        file_size: u64,
        options: JobOptions,
    ) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4(),
            status: JobStatus::Queued,
            stages: StageStatuses::default(),
            original_filename: original_filename.into(),
            format,
            file_size,
            options,
            ocr_pages: Vec::new(),
            stats: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Sets one stage status and re-projects the job status from it.
    pub fn set_stage(&mut self, stage: Stage, status: StageStatus) {
        self.stages.set(stage, status);
        self.sync_status();
    }

    /// Marks `stage` failed with a message; the projection turns the job
    /// terminal and no further stage will execute.
    pub fn fail(&mut self, stage: Stage, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.set_stage(stage, StageStatus::Failed);
    }

    /// Fails whichever stage is currently open. Used by the forcible timeout
    /// path, which cannot know how far the abandoned pipeline got.
    pub fn fail_in_progress(&mut self, message: impl Into<String>) {
        let stage = self.stages.active().unwrap_or(Stage::Translation);
        self.fail(stage, message);
    }

    /// Re-projects `status` from `stages` and advances `updated_at`.
    pub fn sync_status(&mut self) {
        self.status = derive_status(&self.stages);
        if self.status == JobStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
        self.touch();
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        progress_percent(&self.stages)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }

    /// Resets failed stages to pending for a re-submission, so the pipeline
    /// re-enters at the first non-completed stage. Completed stages keep
    /// their status; their committed output is never re-produced.
    pub fn prepare_retry(&mut self) {
        for stage in [Stage::Extraction, Stage::Ocr, Stage::Translation] {
            if self.stages.get(stage) == StageStatus::Failed {
                self.stages.set(stage, StageStatus::Pending);
            }
        }
        self.error_message = None;
        self.sync_status();
    }

    /// `updated_at` is monotonically non-decreasing even if the wall clock
    /// steps backwards.
    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}
