use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::get_file::FileDetails;
use crate::application::use_cases::upload_file::UploadFileResponse;
use crate::domain::entities::File;

use super::JobStatusDto;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: i64,
    pub file_hash: String,
    pub duration_seconds: Option<f64>,
    pub processing_status: String,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&File> for FileResponseDto {
    fn from(file: &File) -> Self {
        Self {
            id: file.id(),
            project_id: file.project_id(),
            file_name: file.file_name().to_string(),
            content_type: file.content_type().map(str::to_string),
            file_size: file.file_size(),
            file_hash: file.file_hash().to_string(),
            duration_seconds: file.duration_seconds(),
            processing_status: file.status().as_str().to_string(),
            error_message: file.status().error_message().map(str::to_string),
            created_at: file.created_at().to_rfc3339(),
            updated_at: file.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetailsDto {
    #[serde(flatten)]
    pub file: FileResponseDto,
    pub media_url: String,
    pub media_url_expires_at: String,
    pub latest_job: Option<JobStatusDto>,
}

impl From<FileDetails> for FileDetailsDto {
    fn from(details: FileDetails) -> Self {
        Self {
            file: FileResponseDto::from(&details.file),
            media_url: details.media_url.url,
            media_url_expires_at: details.media_url.expires_at.to_rfc3339(),
            latest_job: details.latest_job.as_ref().map(JobStatusDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponseDto {
    pub file: FileResponseDto,
    pub job_id: Option<Uuid>,
    pub message: String,
}

impl From<UploadFileResponse> for UploadResponseDto {
    fn from(response: UploadFileResponse) -> Self {
        let message = match &response.job {
            Some(_) => "File uploaded and queued for processing".to_string(),
            None => "File uploaded successfully".to_string(),
        };
        Self {
            file: FileResponseDto::from(&response.file),
            job_id: response.job.as_ref().map(|job| job.id()),
            message,
        }
    }
}

/// Query string of a signed media URL.
#[derive(Debug, Deserialize)]
pub struct MediaAccessQuery {
    pub expires: i64,
    pub signature: String,
}
