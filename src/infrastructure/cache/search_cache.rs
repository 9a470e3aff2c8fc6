use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::application::ports::search_cache::{SearchCache, SearchCacheKey};
use crate::application::services::search_service::SearchHit;
use crate::config::SearchConfig;

/// Process-wide TTL cache of search hits. Not shared between instances.
#[derive(Clone)]
pub struct MokaSearchCache {
    cache: Cache<SearchCacheKey, Arc<Vec<SearchHit>>>,
}

impl MokaSearchCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_max_entries,
        )
    }

    /// Drops expired entries every `interval` until the runtime shuts down.
    pub fn spawn_sweeper(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.run_pending_tasks();
                tracing::trace!(entries = cache.entry_count(), "Search cache swept");
            }
        })
    }
}

impl SearchCache for MokaSearchCache {
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchHit>> {
        self.cache.get(key).map(|hits| hits.as_ref().clone())
    }

    fn insert(&self, key: SearchCacheKey, hits: Vec<SearchHit>) {
        self.cache.insert(key, Arc::new(hits));
    }

    fn invalidate_project(&self, project_id: Uuid) {
        let stale: Vec<Arc<SearchCacheKey>> = self
            .cache
            .iter()
            .filter(|(key, _)| key.project_id == project_id)
            .map(|(key, _)| key)
            .collect();
        for key in stale {
            self.cache.invalidate(key.as_ref());
        }
    }
}
