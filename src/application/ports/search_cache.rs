use uuid::Uuid;

use crate::application::services::search_service::SearchHit;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCacheKey {
    pub project_id: Uuid,
    pub query: String,
    pub limit: i64,
    /// Bit pattern of the (clamped, finite) threshold so the key stays hashable.
    pub threshold_bits: u64,
}

impl SearchCacheKey {
    pub fn new(project_id: Uuid, query: &str, limit: i64, threshold: f64) -> Self {
        Self {
            project_id,
            query: query.trim().to_string(),
            limit,
            threshold_bits: threshold.to_bits(),
        }
    }
}

/// Short-lived cache of formatted search hits.
pub trait SearchCache: Send + Sync {
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchHit>>;

    fn insert(&self, key: SearchCacheKey, hits: Vec<SearchHit>);

    fn invalidate_project(&self, project_id: Uuid);
}
