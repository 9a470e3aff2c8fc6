use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Project;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            owner_id: project.owner_id(),
            name: project.name().to_string(),
            couple_names: project.couple_names().map(str::to_string),
            wedding_date: project.wedding_date(),
            venue: project.venue().map(str::to_string),
            status: project.status().as_str().to_string(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequestDto {
    pub name: String,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequestDto {
    pub name: Option<String>,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProjectRequestDto {
    pub project_id: Uuid,
    pub email: String,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProjectResponseDto {
    pub invitation_id: Uuid,
    pub email: String,
    pub invite_url: String,
    pub email_sent: bool,
}
