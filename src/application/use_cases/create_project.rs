use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::use_cases::errors::ProjectError;
use crate::domain::entities::Project;
use crate::domain::repositories::ProjectRepository;

#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub couple_names: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
}

pub struct CreateProjectUseCase {
    project_repository: Arc<dyn ProjectRepository>,
}

impl CreateProjectUseCase {
    pub fn new(project_repository: Arc<dyn ProjectRepository>) -> Self {
        Self { project_repository }
    }

    pub async fn execute(&self, request: CreateProjectRequest) -> Result<Project, ProjectError> {
        let project = Project::new(
            request.owner_id,
            request.name,
            request.couple_names,
            request.wedding_date,
            request.venue,
        )
        .map_err(ProjectError::ValidationError)?;

        self.project_repository.save(&project).await?;
        tracing::info!(project_id = %project.id(), owner_id = %project.owner_id(), "Project created");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::InMemoryProjectRepository;

    #[tokio::test]
    async fn test_create_project() {
        let repository = Arc::new(InMemoryProjectRepository::default());
        let use_case = CreateProjectUseCase::new(repository.clone());
        let owner = Uuid::new_v4();

        let project = use_case
            .execute(CreateProjectRequest {
                owner_id: owner,
                name: "  Ana & Leo  ".to_string(),
                couple_names: Some("Ana & Leo".to_string()),
                wedding_date: NaiveDate::from_ymd_opt(2025, 6, 14),
                venue: None,
            })
            .await
            .unwrap();

        assert_eq!(project.name(), "Ana & Leo");
        assert!(repository.find_by_id(project.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let use_case = CreateProjectUseCase::new(Arc::new(InMemoryProjectRepository::default()));
        let result = use_case
            .execute(CreateProjectRequest {
                owner_id: Uuid::new_v4(),
                name: "   ".to_string(),
                couple_names: None,
                wedding_date: None,
                venue: None,
            })
            .await;
        assert!(matches!(result, Err(ProjectError::ValidationError(_))));
    }
}
