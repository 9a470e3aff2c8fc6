use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{FileHash, ProcessingStatus};

/// Raw footage uploaded to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    id: Uuid,
    project_id: Uuid,
    file_name: String,
    storage_path: String,
    content_type: Option<String>,
    file_size: i64,
    file_hash: FileHash,
    duration_seconds: Option<f64>,
    status: ProcessingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl File {
    pub fn new(
        id: Uuid,
        project_id: Uuid,
        file_name: String,
        storage_path: String,
        content_type: Option<String>,
        file_size: i64,
        file_hash: FileHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            file_name,
            storage_path,
            content_type,
            file_size,
            file_hash,
            duration_seconds: None,
            status: ProcessingStatus::Uploaded,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: Uuid,
        project_id: Uuid,
        file_name: String,
        storage_path: String,
        content_type: Option<String>,
        file_size: i64,
        file_hash: FileHash,
        duration_seconds: Option<f64>,
        status: ProcessingStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            file_name,
            storage_path,
            content_type,
            file_size,
            file_hash,
            duration_seconds,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn file_hash(&self) -> &FileHash {
        &self.file_hash
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn status(&self) -> &ProcessingStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_duration(&mut self, seconds: f64) -> Result<(), String> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(format!("Invalid video duration: {}", seconds));
        }
        self.duration_seconds = Some(seconds);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        self.transition(ProcessingStatus::Processing)
    }

    pub fn complete_processing(&mut self) -> Result<(), String> {
        self.transition(ProcessingStatus::Completed)
    }

    pub fn fail_processing(&mut self, error: String) -> Result<(), String> {
        self.transition(ProcessingStatus::Failed(error))
    }

    fn transition(&mut self, next: ProcessingStatus) -> Result<(), String> {
        if !self.status.can_transition_to(&next) {
            return Err(format!(
                "File {} cannot move from {} to {}",
                self.id, self.status, next
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
