use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{JobResult, ProcessingJob};
use crate::domain::value_objects::{JobStatus, JobStep};
use crate::infrastructure::database::schema::processing_jobs;

#[derive(Debug, Queryable, Identifiable, Selectable)]
#[diesel(table_name = processing_jobs)]
#[diesel(primary_key(id))]
pub struct JobModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub status: String,
    pub current_step: String,
    pub progress: i32,
    pub error_message: Option<String>,
    pub result_summary: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = processing_jobs)]
pub struct NewJobModel {
    pub id: Uuid,
    pub file_id: Uuid,
    pub status: String,
    pub current_step: String,
    pub progress: i32,
    pub error_message: Option<String>,
    pub result_summary: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = processing_jobs)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateJobModel {
    pub status: String,
    pub current_step: String,
    pub progress: i32,
    pub error_message: Option<String>,
    pub result_summary: Option<serde_json::Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

fn summary_json(job: &ProcessingJob) -> Result<Option<serde_json::Value>, String> {
    job.result_summary()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| format!("Failed to encode result summary: {}", e))
}

impl TryFrom<&ProcessingJob> for NewJobModel {
    type Error = String;

    fn try_from(job: &ProcessingJob) -> Result<Self, Self::Error> {
        Ok(Self {
            id: job.id(),
            file_id: job.file_id(),
            status: job.status().as_str().to_string(),
            current_step: job.current_step().as_str().to_string(),
            progress: job.progress(),
            error_message: job.error_message().map(str::to_string),
            result_summary: summary_json(job)?,
            created_at: job.created_at(),
            started_at: job.started_at(),
            completed_at: job.completed_at(),
        })
    }
}

impl TryFrom<&ProcessingJob> for UpdateJobModel {
    type Error = String;

    fn try_from(job: &ProcessingJob) -> Result<Self, Self::Error> {
        Ok(Self {
            status: job.status().as_str().to_string(),
            current_step: job.current_step().as_str().to_string(),
            progress: job.progress(),
            error_message: job.error_message().map(str::to_string),
            result_summary: summary_json(job)?,
            started_at: job.started_at(),
            completed_at: job.completed_at(),
        })
    }
}

impl TryFrom<JobModel> for ProcessingJob {
    type Error = String;

    fn try_from(model: JobModel) -> Result<Self, Self::Error> {
        let status = JobStatus::from_parts(&model.status, model.error_message.as_deref())?;
        let current_step = JobStep::parse(&model.current_step)?;
        let result_summary = model
            .result_summary
            .map(serde_json::from_value::<JobResult>)
            .transpose()
            .map_err(|e| format!("Failed to parse result summary: {}", e))?;

        Ok(ProcessingJob::from_database(
            model.id,
            model.file_id,
            status,
            current_step,
            model.progress,
            model.created_at,
            model.started_at,
            model.completed_at,
            result_summary,
        ))
    }
}
