use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::compilation_service::CompiledReel;
use crate::application::use_cases::get_compilation::CompilationDetails;
use crate::domain::entities::{Compilation, CompilationMoment};

use super::MomentDto;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompilationRequestDto {
    pub query: String,
    pub project_id: Uuid,
    pub max_duration: Option<f64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationListQuery {
    pub project_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub query: String,
    pub max_duration: f64,
    pub total_duration: f64,
    pub status: String,
    pub output_url: Option<String>,
    pub error_message: Option<String>,
    pub created_by: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Compilation> for CompilationDto {
    fn from(compilation: &Compilation) -> Self {
        Self {
            id: compilation.id(),
            project_id: compilation.project_id(),
            name: compilation.name().to_string(),
            query: compilation.query().to_string(),
            max_duration: compilation.max_duration_seconds(),
            total_duration: compilation.total_duration_seconds(),
            status: compilation.status().as_str().to_string(),
            output_url: compilation.output_url().map(str::to_string),
            error_message: compilation.error_message().map(str::to_string),
            created_by: compilation.created_by(),
            created_at: compilation.created_at().to_rfc3339(),
            updated_at: compilation.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationEntryDto {
    pub moment_id: Uuid,
    pub position: i32,
    pub transition_type: String,
    pub transition_duration: f64,
}

impl From<&CompilationMoment> for CompilationEntryDto {
    fn from(entry: &CompilationMoment) -> Self {
        Self {
            moment_id: entry.moment_id(),
            position: entry.position(),
            transition_type: entry.transition_type().as_str().to_string(),
            transition_duration: entry.transition_duration(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledReelDto {
    pub compilation: CompilationDto,
    pub moments: Vec<MomentDto>,
    pub entries: Vec<CompilationEntryDto>,
}

impl From<CompiledReel> for CompiledReelDto {
    fn from(reel: CompiledReel) -> Self {
        Self {
            compilation: CompilationDto::from(&reel.compilation),
            moments: reel.moments.iter().map(MomentDto::from).collect(),
            entries: reel.entries.iter().map(CompilationEntryDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationStatusDto {
    pub compilation: CompilationDto,
    pub entries: Vec<CompilationEntryDto>,
}

impl From<CompilationDetails> for CompilationStatusDto {
    fn from(details: CompilationDetails) -> Self {
        Self {
            compilation: CompilationDto::from(&details.compilation),
            entries: details.entries.iter().map(CompilationEntryDto::from).collect(),
        }
    }
}
