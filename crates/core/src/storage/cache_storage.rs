use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::errors::CoreError;
use crate::models::http::{CacheKey, Response};

use super::format;

/// A stored response plus the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub response: Response,
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            cached_at: Utc::now(),
        }
    }
}

/// One named, isolated key → response map.
pub type Partition = HashMap<CacheKey, CachedResponse>;

/// Named cache partitions behind a single lock.
///
/// Every write replaces the whole entry for its key, so concurrent writers
/// never interleave within an entry: the last `put` for a key wins.
/// Partitions are created lazily on first `put` or explicitly with `open`.
#[derive(Debug, Default)]
pub struct CacheStorage {
    partitions: RwLock<BTreeMap<String, Partition>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `partition` if it doesn't exist yet.
    pub async fn open(&self, partition: &str) {
        self.partitions
            .write()
            .await
            .entry(partition.to_string())
            .or_default();
    }

    pub async fn get(&self, partition: &str, key: &CacheKey) -> Option<Response> {
        self.partitions
            .read()
            .await
            .get(partition)
            .and_then(|p| p.get(key))
            .map(|entry| entry.response.clone())
    }

    /// Like `get`, but also returns when the entry was written.
    pub async fn get_entry(&self, partition: &str, key: &CacheKey) -> Option<CachedResponse> {
        self.partitions
            .read()
            .await
            .get(partition)
            .and_then(|p| p.get(key))
            .cloned()
    }

    /// Insert or overwrite the entry for `key` in `partition`.
    pub async fn put(&self, partition: &str, key: CacheKey, response: Response) {
        self.partitions
            .write()
            .await
            .entry(partition.to_string())
            .or_default()
            .insert(key, CachedResponse::new(response));
    }

    /// Remove a single entry. Returns whether it existed.
    pub async fn remove(&self, partition: &str, key: &CacheKey) -> bool {
        self.partitions
            .write()
            .await
            .get_mut(partition)
            .is_some_and(|p| p.remove(key).is_some())
    }

    /// Drop a whole partition. Returns whether it existed.
    pub async fn delete(&self, partition: &str) -> bool {
        self.partitions.write().await.remove(partition).is_some()
    }

    /// Look `key` up in each of `partitions`, in order, returning the first hit.
    pub async fn match_in(&self, partitions: &[&str], key: &CacheKey) -> Option<Response> {
        let guard = self.partitions.read().await;
        partitions
            .iter()
            .filter_map(|name| guard.get(*name))
            .find_map(|p| p.get(key))
            .map(|entry| entry.response.clone())
    }

    /// Names of all existing partitions, sorted.
    pub async fn partition_names(&self) -> Vec<String> {
        self.partitions.read().await.keys().cloned().collect()
    }

    pub async fn has_partition(&self, partition: &str) -> bool {
        self.partitions.read().await.contains_key(partition)
    }

    /// Number of entries in `partition` (0 if it doesn't exist).
    pub async fn len(&self, partition: &str) -> usize {
        self.partitions
            .read()
            .await
            .get(partition)
            .map_or(0, |p| p.len())
    }

    /// Keys stored in `partition`, sorted.
    pub async fn keys(&self, partition: &str) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self
            .partitions
            .read()
            .await
            .get(partition)
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Total number of entries across all partitions.
    pub async fn total_entries(&self) -> usize {
        self.partitions.read().await.values().map(|p| p.len()).sum()
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Serialize every partition to a framed snapshot.
    ///
    /// Flow: partitions → bincode → TJCS format bytes
    pub async fn snapshot_to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let guard = self.partitions.read().await;
        let payload = bincode::serialize(&*guard)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize cache: {e}")))?;
        Ok(format::write_file(
            format::CACHE_MAGIC,
            format::CURRENT_VERSION,
            &payload,
        ))
    }

    /// Rebuild storage from a snapshot produced by `snapshot_to_bytes`.
    pub fn restore_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let (_version, payload) = format::read_file(format::CACHE_MAGIC, data)?;
        let partitions: BTreeMap<String, Partition> = bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize cache: {e}")))?;
        Ok(Self {
            partitions: RwLock::new(partitions),
        })
    }
}
