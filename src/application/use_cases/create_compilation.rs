use std::sync::Arc;

use crate::application::services::AccessControl;
use crate::application::services::compilation_service::{
    CompilationDraft, CompilationService, CompiledReel,
};
use crate::application::use_cases::errors::CompilationError;

pub struct CreateCompilationUseCase {
    access_control: Arc<AccessControl>,
    compilation_service: Arc<CompilationService>,
}

impl CreateCompilationUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        compilation_service: Arc<CompilationService>,
    ) -> Self {
        Self {
            access_control,
            compilation_service,
        }
    }

    pub async fn execute(&self, draft: CompilationDraft) -> Result<CompiledReel, CompilationError> {
        self.access_control
            .require_access(draft.project_id, draft.created_by)
            .await?;
        Ok(self.compilation_service.create(draft).await?)
    }
}
