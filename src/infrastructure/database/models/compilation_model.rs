use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{
    Compilation, CompilationMoment, CompilationStatus, TransitionType,
};
use crate::infrastructure::database::schema::{compilation_moments, video_compilations};

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = video_compilations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CompilationModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub query: String,
    pub max_duration_seconds: f64,
    pub total_duration_seconds: f64,
    pub status: String,
    pub transcode_job_id: Option<String>,
    pub output_url: Option<String>,
    pub error_message: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = compilation_moments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompilationMomentModel {
    pub id: Uuid,
    pub compilation_id: Uuid,
    pub moment_id: Uuid,
    pub position: i32,
    pub transition_type: String,
    pub transition_duration: f64,
}

impl From<&Compilation> for CompilationModel {
    fn from(compilation: &Compilation) -> Self {
        Self {
            id: compilation.id(),
            project_id: compilation.project_id(),
            name: compilation.name().to_string(),
            query: compilation.query().to_string(),
            max_duration_seconds: compilation.max_duration_seconds(),
            total_duration_seconds: compilation.total_duration_seconds(),
            status: compilation.status().as_str().to_string(),
            transcode_job_id: compilation.transcode_job_id().map(str::to_string),
            output_url: compilation.output_url().map(str::to_string),
            error_message: compilation.error_message().map(str::to_string),
            created_by: compilation.created_by(),
            created_at: compilation.created_at(),
            updated_at: compilation.updated_at(),
        }
    }
}

impl TryFrom<CompilationModel> for Compilation {
    type Error = String;

    fn try_from(model: CompilationModel) -> Result<Self, Self::Error> {
        let status: CompilationStatus = model.status.parse()?;
        Ok(Compilation::from_database(
            model.id,
            model.project_id,
            model.name,
            model.query,
            model.max_duration_seconds,
            model.total_duration_seconds,
            status,
            model.transcode_job_id,
            model.output_url,
            model.error_message,
            model.created_by,
            model.created_at,
            model.updated_at,
        ))
    }
}

impl From<&CompilationMoment> for CompilationMomentModel {
    fn from(entry: &CompilationMoment) -> Self {
        Self {
            id: entry.id(),
            compilation_id: entry.compilation_id(),
            moment_id: entry.moment_id(),
            position: entry.position(),
            transition_type: entry.transition_type().as_str().to_string(),
            transition_duration: entry.transition_duration(),
        }
    }
}

impl TryFrom<CompilationMomentModel> for CompilationMoment {
    type Error = String;

    fn try_from(model: CompilationMomentModel) -> Result<Self, Self::Error> {
        let transition: TransitionType = model.transition_type.parse()?;
        Ok(CompilationMoment::from_database(
            model.id,
            model.compilation_id,
            model.moment_id,
            model.position,
            transition,
            model.transition_duration,
        ))
    }
}
