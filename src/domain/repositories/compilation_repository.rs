use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Compilation, CompilationMoment};
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait CompilationRepository: Send + Sync {
    /// Stores the compilation together with its ordered moments.
    async fn save(
        &self,
        compilation: &Compilation,
        moments: &[CompilationMoment],
    ) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Compilation>, RepositoryError>;
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Compilation>, RepositoryError>;
    async fn find_moments(
        &self,
        compilation_id: Uuid,
    ) -> Result<Vec<CompilationMoment>, RepositoryError>;
    async fn update(&self, compilation: &Compilation) -> Result<(), RepositoryError>;
}
