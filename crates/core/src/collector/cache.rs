//! TTL cache for fetched records.
//!
//! Expiry is lazy: readers treat a stale entry as a miss, and the next
//! successful fetch overwrites it in place. There is no background sweep.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::types::Record;

#[derive(Debug, Clone)]
struct CacheEntry {
    record: Record,
    stored_at: DateTime<Utc>,
}

/// In-memory record cache keyed by subject.
///
/// Unbounded; mutated only by the orchestrator's fetch path and the
/// invalidate/clear operations.
pub struct RecordCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a record, treating entries older than `ttl_ms` as absent.
    pub async fn get(&self, subject: &str, ttl_ms: u64) -> Option<Record> {
        let entries = self.entries.read().await;
        let entry = entries.get(subject)?;
        let age = Utc::now().signed_duration_since(entry.stored_at);
        if age < Duration::milliseconds(ttl_ms as i64) {
            Some(entry.record.clone())
        } else {
            None
        }
    }

    /// Store a record under its subject key, stamped with the current time.
    pub async fn insert(&self, record: Record) {
        let mut entries = self.entries.write().await;
        entries.insert(
            record.subject_id.clone(),
            CacheEntry {
                record,
                stored_at: Utc::now(),
            },
        );
    }

    /// Remove a single entry. Returns whether one was present.
    pub async fn invalidate(&self, subject: &str) -> bool {
        self.entries.write().await.remove(subject).is_some()
    }

    /// Remove all entries.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::types::{FieldMap, MetricValue, Provenance};

    fn record(subject: &str) -> Record {
        let mut fields = FieldMap::new();
        fields.insert("revenue".to_string(), MetricValue::Number(1.0));
        Record {
            subject_id: subject.to_string(),
            fields,
            provenance: Provenance::Live,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = RecordCache::new();
        cache.insert(record("acme")).await;

        let hit = cache.get("acme", 60_000).await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().subject_id, "acme");
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = RecordCache::new();
        cache.insert(record("acme")).await;

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert!(cache.get("acme", 10).await.is_none());

        // The stale entry still occupies a slot until overwritten.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_absent_key_is_a_miss() {
        let cache = RecordCache::new();
        assert!(cache.get("missing", 60_000).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_overwrites() {
        let cache = RecordCache::new();
        cache.insert(record("acme")).await;

        let mut updated = record("acme");
        updated.provenance = Provenance::Synthetic;
        cache.insert(updated).await;

        assert_eq!(cache.len().await, 1);
        let hit = cache.get("acme", 60_000).await.unwrap();
        assert_eq!(hit.provenance, Provenance::Synthetic);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = RecordCache::new();
        cache.insert(record("acme")).await;

        assert!(cache.invalidate("acme").await);
        assert!(!cache.invalidate("acme").await);
        assert!(cache.get("acme", 60_000).await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = RecordCache::new();
        cache.insert(record("a")).await;
        cache.insert(record("b")).await;

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
