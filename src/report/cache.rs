use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// TTL cache for assembled reports, keyed by report kind plus the filter
/// that produced it. Built once in `main` and injected into the handlers;
/// every mutating endpoint calls `invalidate_all` so stale reports never
/// outlive a data change by more than the in-flight requests.
#[derive(Clone)]
pub struct ReportCache {
    inner: Cache<String, Value>,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(kind: &str, filter: &str) -> String {
        format!("{kind}:{filter}")
    }

    pub async fn get(&self, kind: &str, filter: &str) -> Option<Value> {
        self.inner.get(&Self::key(kind, filter)).await
    }

    pub async fn insert(&self, kind: &str, filter: &str, report: Value) {
        self.inner.insert(Self::key(kind, filter), report).await;
    }

    /// Drop every cached report. Called after check-ins, leave transitions,
    /// holiday and quota changes.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        log::info!("report cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[actix_web::test]
    async fn caches_by_kind_and_filter() {
        let cache = ReportCache::new(Duration::from_secs(60));
        cache
            .insert("summary", "2024-04-01:2024-04-05", json!({"x": 1}))
            .await;

        assert_eq!(
            cache.get("summary", "2024-04-01:2024-04-05").await,
            Some(json!({"x": 1}))
        );
        assert_eq!(cache.get("summary", "2024-04-01:2024-04-06").await, None);
        assert_eq!(cache.get("daily", "2024-04-01:2024-04-05").await, None);
    }

    #[actix_web::test]
    async fn invalidate_all_clears_entries() {
        let cache = ReportCache::new(Duration::from_secs(60));
        cache.insert("summary", "a", json!(1)).await;
        cache.insert("daily", "b", json!(2)).await;

        cache.invalidate_all();
        // moka applies invalidation lazily; run_pending_tasks makes it
        // observable immediately.
        cache.inner.run_pending_tasks().await;

        assert_eq!(cache.get("summary", "a").await, None);
        assert_eq!(cache.get("daily", "b").await, None);
    }
}
