use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::ProcessingJob;
use crate::domain::entities::processing_job::JobResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusDto {
    pub job_id: Uuid,
    pub file_id: Uuid,
    pub status: String,
    pub current_step: String,
    pub progress: i32,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub error_message: Option<String>,
    pub result_summary: Option<JobResultDto>,
    pub duration_ms: Option<i64>,
    pub is_terminal: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResultDto {
    pub moments_created: i32,
    pub embeddings_generated: i32,
    pub fallback_embeddings: i32,
    pub thumbnails: i32,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueJobResponseDto {
    pub job_id: Uuid,
    pub file_id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelJobResponseDto {
    pub job_id: Uuid,
    pub status: String,
    pub message: String,
}

impl From<&ProcessingJob> for JobStatusDto {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            job_id: job.id(),
            file_id: job.file_id(),
            status: job.status().as_str().to_string(),
            current_step: job.current_step().as_str().to_string(),
            progress: job.progress(),
            created_at: job.created_at().to_rfc3339(),
            started_at: job.started_at().map(|dt| dt.to_rfc3339()),
            completed_at: job.completed_at().map(|dt| dt.to_rfc3339()),
            error_message: job.error_message().map(|s| s.to_string()),
            result_summary: job.result_summary().map(JobResultDto::from),
            duration_ms: job.duration().map(|d| d.num_milliseconds()),
            is_terminal: job.status().is_terminal(),
        }
    }
}

impl From<&JobResult> for JobResultDto {
    fn from(result: &JobResult) -> Self {
        Self {
            moments_created: result.moments_created,
            embeddings_generated: result.embeddings_generated,
            fallback_embeddings: result.fallback_embeddings,
            thumbnails: result.thumbnails,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

impl From<&ProcessingJob> for QueueJobResponseDto {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            job_id: job.id(),
            file_id: job.file_id(),
            status: job.status().as_str().to_string(),
            message: "Processing job queued".to_string(),
        }
    }
}

impl From<&ProcessingJob> for CancelJobResponseDto {
    fn from(job: &ProcessingJob) -> Self {
        Self {
            job_id: job.id(),
            status: job.status().as_str().to_string(),
            message: "Job cancelled".to_string(),
        }
    }
}
