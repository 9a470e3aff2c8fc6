use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::AccessControl;
use crate::application::use_cases::errors::ProjectError;
use crate::domain::entities::VideoMoment;
use crate::domain::repositories::{MomentFilter, MomentRepository};

pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Clone)]
pub struct MomentPage {
    pub moments: Vec<VideoMoment>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Browses a project's moments, optionally narrowed to one kind or file.
pub struct ListMomentsUseCase {
    access_control: Arc<AccessControl>,
    moment_repository: Arc<dyn MomentRepository>,
}

impl ListMomentsUseCase {
    pub fn new(
        access_control: Arc<AccessControl>,
        moment_repository: Arc<dyn MomentRepository>,
    ) -> Self {
        Self {
            access_control,
            moment_repository,
        }
    }

    pub async fn execute(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        filter: MomentFilter,
    ) -> Result<MomentPage, ProjectError> {
        if filter.offset < 0 {
            return Err(ProjectError::ValidationError(
                "Offset cannot be negative".to_string(),
            ));
        }
        if filter.limit <= 0 || filter.limit > MAX_PAGE_SIZE {
            return Err(ProjectError::ValidationError(format!(
                "Limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        self.access_control
            .require_access(project_id, user_id)
            .await?;

        let (moments, total) = self
            .moment_repository
            .find_by_project(project_id, &filter)
            .await?;
        Ok(MomentPage {
            moments,
            total,
            offset: filter.offset,
            limit: filter.limit,
        })
    }
}
