use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{JobStatus, JobStep};

/// One run of the ingestion pipeline over a single uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingJob {
    id: Uuid,
    file_id: Uuid,
    status: JobStatus,
    current_step: JobStep,
    progress: i32, // 0 to 100
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result_summary: Option<JobResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub moments_created: i32,
    pub embeddings_generated: i32,
    pub fallback_embeddings: i32,
    pub thumbnails: i32,
    pub processing_time_ms: u64,
}

impl ProcessingJob {
    pub fn new(file_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            status: JobStatus::Pending,
            current_step: JobStep::Queued,
            progress: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result_summary: None,
        }
    }

    /// Rebuilds a job from persisted columns.
    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        file_id: Uuid,
        status: JobStatus,
        current_step: JobStep,
        progress: i32,
        created_at: DateTime<Utc>,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        result_summary: Option<JobResult>,
    ) -> Self {
        Self {
            id,
            file_id,
            status,
            current_step,
            progress,
            created_at,
            started_at,
            completed_at,
            result_summary,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    pub fn current_step(&self) -> JobStep {
        self.current_step
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn result_summary(&self) -> Option<&JobResult> {
        self.result_summary.as_ref()
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        if !self.status.is_pending() {
            return Err(format!("Job is not in pending state: {}", self.status));
        }

        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn advance(&mut self, step: JobStep) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.current_step = step;
        self.progress = step.progress();
        Ok(())
    }

    pub fn complete_processing(&mut self, result: JobResult) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.status = JobStatus::Completed;
        self.current_step = JobStep::Done;
        self.progress = JobStep::Done.progress();
        self.completed_at = Some(Utc::now());
        self.result_summary = Some(result);
        Ok(())
    }

    pub fn fail_processing(&mut self, error: String) -> Result<(), String> {
        if !self.status.is_processing() {
            return Err("Job is not in processing state".to_string());
        }

        self.status = JobStatus::Failed(error);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), String> {
        if self.status.is_terminal() {
            return Err(format!("Cannot cancel a job that is already {}", self.status));
        }

        self.status = JobStatus::Cancelled;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, JobStatus::Pending | JobStatus::Processing)
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            (Some(start), None) if self.status.is_processing() => Some(Utc::now() - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_creation() {
        let file_id = Uuid::new_v4();
        let job = ProcessingJob::new(file_id);

        assert_eq!(job.file_id(), file_id);
        assert_eq!(job.status(), &JobStatus::Pending);
        assert_eq!(job.current_step(), JobStep::Queued);
        assert_eq!(job.progress(), 0);
        assert!(job.is_active());
    }

    #[test]
    fn test_job_workflow() {
        let mut job = ProcessingJob::new(Uuid::new_v4());

        assert!(job.advance(JobStep::Transcribing).is_err());
        job.start_processing().unwrap();
        assert!(job.started_at().is_some());

        job.advance(JobStep::DetectingFaces).unwrap();
        assert_eq!(job.progress(), JobStep::DetectingFaces.progress());

        job.complete_processing(JobResult {
            moments_created: 12,
            embeddings_generated: 12,
            fallback_embeddings: 0,
            thumbnails: 20,
            processing_time_ms: 5000,
        })
        .unwrap();

        assert_eq!(job.status(), &JobStatus::Completed);
        assert_eq!(job.progress(), 100);
        assert!(job.completed_at().is_some());
        assert!(!job.is_active());
    }

    #[test]
    fn test_job_failure_keeps_message() {
        let mut job = ProcessingJob::new(Uuid::new_v4());
        job.start_processing().unwrap();
        job.fail_processing("transcription failed".to_string())
            .unwrap();

        assert_eq!(job.error_message(), Some("transcription failed"));
        assert!(job.cancel().is_err());
    }

    #[test]
    fn test_cancel_pending_job() {
        let mut job = ProcessingJob::new(Uuid::new_v4());
        job.cancel().unwrap();
        assert!(job.status().is_cancelled());
        assert!(job.start_processing().is_err());
    }
}
