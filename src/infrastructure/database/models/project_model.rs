use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{Project, ProjectStatus};
use crate::infrastructure::database::schema::projects;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct NewProjectModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for NewProjectModel {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id(),
            owner_id: project.owner_id(),
            name: project.name().to_string(),
            couple_names: project.couple_names().map(str::to_string),
            wedding_date: project.wedding_date(),
            venue: project.venue().map(str::to_string),
            status: project.status().as_str().to_string(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

impl TryFrom<ProjectModel> for Project {
    type Error = String;

    fn try_from(model: ProjectModel) -> Result<Self, Self::Error> {
        let status: ProjectStatus = model.status.parse()?;
        Ok(Project::from_database(
            model.id,
            model.owner_id,
            model.name,
            model.couple_names,
            model.wedding_date,
            model.venue,
            status,
            model.created_at,
            model.updated_at,
        ))
    }
}
