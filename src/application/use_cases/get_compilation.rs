use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::services::compilation_service::CompilationService;
use crate::application::use_cases::errors::CompilationError;
use crate::domain::entities::{Compilation, CompilationMoment};
use crate::domain::repositories::CompilationRepository;

#[derive(Debug, Clone)]
pub struct CompilationDetails {
    pub compilation: Compilation,
    pub entries: Vec<CompilationMoment>,
}

pub struct GetCompilationUseCase {
    access_control: Arc<AccessControl>,
    compilation_repository: Arc<dyn CompilationRepository>,
    compilation_service: Arc<CompilationService>,
}

impl GetCompilationUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        compilation_repository: Arc<dyn CompilationRepository>,
        compilation_service: Arc<CompilationService>,
    ) -> Self {
        Self {
            access_control,
            compilation_repository,
            compilation_service,
        }
    }

    /// Loads a compilation, polling the transcoder if it is still rendering.
    pub async fn execute(
        &self,
        compilation_id: Uuid,
        user_id: Uuid,
    ) -> Result<CompilationDetails, CompilationError> {
        let compilation = self
            .compilation_repository
            .find_by_id(compilation_id)
            .await?
            .ok_or(CompilationError::NotFound(compilation_id))?;
        self.access_control
            .require_access(compilation.project_id(), user_id)
            .await?;

        let compilation = self.compilation_service.refresh_status(compilation).await?;
        let entries = self
            .compilation_repository
            .find_moments(compilation_id)
            .await?;
        Ok(CompilationDetails {
            compilation,
            entries,
        })
    }

    pub async fn list(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Compilation>, CompilationError> {
        self.access_control
            .require_access(project_id, user_id)
            .await?;
        Ok(self
            .compilation_repository
            .find_by_project(project_id)
            .await?)
    }
}
