//! Response cache for model calls, keyed by the (system prompt, user prompt) pair.
//!
//! Entries expire lazily: an entry older than the TTL is ignored on read and overwritten
//! by the fresh response. Without `max_entries` the map grows without bound for the
//! lifetime of the process.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use tracing::debug;

use crate::llm_client::{LlmError, ModelParams, TextGenerator};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    system: String,
    user: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    created_at: DateTime<Utc>,
}

pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    /// `max_entries` bounds the cache with least-recently-used eviction; `None` keeps
    /// every entry.
    pub fn new(ttl_ms: i64, max_entries: Option<usize>) -> Self {
        let entries = match max_entries {
            Some(limit) => LruCache::new(NonZeroUsize::new(limit).unwrap_or(NonZeroUsize::MIN)),
            None => LruCache::unbounded(),
        };
        Self {
            ttl: Duration::milliseconds(ttl_ms),
            entries: Mutex::new(entries),
        }
    }

    /// Returns the cached response for this prompt pair, or calls the generator and
    /// stores its answer. Failed calls are not cached.
    pub async fn cached_call(
        &self,
        generator: &dyn TextGenerator,
        system: &str,
        user: &str,
        params: ModelParams,
    ) -> Result<String, LlmError> {
        let key = CacheKey {
            system: system.to_string(),
            user: user.to_string(),
        };

        if let Some(hit) = self.lookup(&key, Utc::now()) {
            debug!("Response cache hit");
            return Ok(hit);
        }

        let value = generator.complete(system, user, params).await?;
        self.store(key, value.clone(), Utc::now());
        Ok(value)
    }

    fn lookup(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        let entry = entries.get(key)?;
        if now - entry.created_at < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn store(&self, key: CacheKey, value: String, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.put(
            key,
            CacheEntry {
                value,
                created_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::FakeGenerator;

    fn key(system: &str, user: &str) -> CacheKey {
        CacheKey {
            system: system.to_string(),
            user: user.to_string(),
        }
    }

    #[tokio::test]
    async fn test_identical_calls_hit_the_model_once() {
        let cache = ResponseCache::new(3_600_000, None);
        let generator = FakeGenerator::replying("site:linkedin.com/in (java) AND spring");

        let first = cache
            .cached_call(&generator, "sys", "user", ModelParams::default())
            .await
            .unwrap();
        let second = cache
            .cached_call(&generator, "sys", "user", ModelParams::default())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_different_prompts_are_different_entries() {
        let cache = ResponseCache::new(3_600_000, None);
        let generator = FakeGenerator::replying("answer");

        for (system, user) in [("sys", "a"), ("sys", "b"), ("other", "a")] {
            cache
                .cached_call(&generator, system, user, ModelParams::default())
                .await
                .unwrap();
        }
        assert_eq!(generator.calls(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_calls_are_not_cached() {
        let cache = ResponseCache::new(3_600_000, None);
        let generator = FakeGenerator::failing();
        assert!(cache
            .cached_call(&generator, "sys", "user", ModelParams::default())
            .await
            .is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(3_600_000, None);
        let created = Utc::now();
        cache.store(key("s", "u"), "v".to_string(), created);

        assert_eq!(
            cache.lookup(&key("s", "u"), created + Duration::minutes(59)),
            Some("v".to_string())
        );
        assert_eq!(cache.lookup(&key("s", "u"), created + Duration::hours(1)), None);
    }

    #[test]
    fn test_zero_capacity_still_keeps_latest_entry() {
        let cache = ResponseCache::new(3_600_000, Some(0));
        let now = Utc::now();
        cache.store(key("s", "a"), "A".to_string(), now);
        cache.store(key("s", "b"), "B".to_string(), now);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key("s", "b"), now), Some("B".to_string()));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = ResponseCache::new(3_600_000, Some(2));
        let now = Utc::now();
        cache.store(key("s", "a"), "A".to_string(), now);
        cache.store(key("s", "b"), "B".to_string(), now);
        // Touch "a" so "b" becomes the eviction candidate
        assert!(cache.lookup(&key("s", "a"), now).is_some());
        cache.store(key("s", "c"), "C".to_string(), now);

        assert_eq!(cache.len(), 2);
        assert!(cache.lookup(&key("s", "a"), now).is_some());
        assert!(cache.lookup(&key("s", "b"), now).is_none());
        assert!(cache.lookup(&key("s", "c"), now).is_some());
    }
}
