use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::VideoMoment;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::MomentKind;

#[derive(Debug, Clone)]
pub struct MomentFilter {
    pub kind: Option<MomentKind>,
    pub file_id: Option<Uuid>,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ScoredMoment {
    pub moment: VideoMoment,
    pub similarity: f64,
}

#[async_trait]
pub trait MomentRepository: Send + Sync {
    /// Swaps every moment of a file for `moments` in one transaction.
    async fn replace_for_file(
        &self,
        file_id: Uuid,
        moments: &[VideoMoment],
    ) -> Result<usize, RepositoryError>;

    async fn find_by_project(
        &self,
        project_id: Uuid,
        filter: &MomentFilter,
    ) -> Result<(Vec<VideoMoment>, i64), RepositoryError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoMoment>, RepositoryError>;

    /// Embedding search through the `search_video_moments` database function.
    async fn search_similar(
        &self,
        project_id: Uuid,
        query_embedding: &Vector,
        threshold: f64,
        limit: i64,
    ) -> Result<Vec<ScoredMoment>, RepositoryError>;

    /// Case-insensitive substring match over description, transcript and tags.
    async fn search_text(
        &self,
        project_id: Uuid,
        query: &str,
    ) -> Result<Vec<VideoMoment>, RepositoryError>;
}
