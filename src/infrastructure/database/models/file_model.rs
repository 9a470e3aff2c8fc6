use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::File as DomainFile;
use crate::domain::value_objects::{FileHash, ProcessingStatus};
use crate::infrastructure::database::schema::files;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FileModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub content_type: Option<String>,
    pub file_size: i64,
    pub file_hash: String,
    pub duration_seconds: Option<f64>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = files)]
#[diesel(treat_none_as_null = true)]
pub struct NewFileModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub storage_path: String,
    pub content_type: Option<String>,
    pub file_size: i64,
    pub file_hash: String,
    pub duration_seconds: Option<f64>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DomainFile> for NewFileModel {
    fn from(file: &DomainFile) -> Self {
        Self {
            id: file.id(),
            project_id: file.project_id(),
            file_name: file.file_name().to_string(),
            storage_path: file.storage_path().to_string(),
            content_type: file.content_type().map(str::to_string),
            file_size: file.file_size(),
            file_hash: file.file_hash().as_str().to_string(),
            duration_seconds: file.duration_seconds(),
            status: file.status().as_str().to_string(),
            error_message: file.status().error_message().map(str::to_string),
            created_at: file.created_at(),
            updated_at: file.updated_at(),
        }
    }
}

impl TryFrom<FileModel> for DomainFile {
    type Error = String;

    fn try_from(model: FileModel) -> Result<Self, Self::Error> {
        let file_hash =
            FileHash::parse(&model.file_hash).map_err(|e| format!("Invalid file hash: {}", e))?;
        let status = ProcessingStatus::from_parts(&model.status, model.error_message.as_deref())?;

        Ok(DomainFile::from_database(
            model.id,
            model.project_id,
            model.file_name,
            model.storage_path,
            model.content_type,
            model.file_size,
            file_hash,
            model.duration_seconds,
            status,
            model.created_at,
            model.updated_at,
        ))
    }
}
