// src/storage/bucket_store.rs

// in-memory bucket storage

// dependencies
use super::BucketStorage;
use crate::bucket::Bucket;
use crate::errors::StorageError;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory bucket store.
/// We use `Arc<DashMap>` for thread-safe concurrent access; the map is
/// sharded, so writers to different keys rarely contend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBucketStorage {
    buckets: Arc<DashMap<String, Arc<Bucket>>>,
}

impl MemoryBucketStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl BucketStorage for MemoryBucketStorage {
    fn get(&self, key: &str) -> Result<Option<Arc<Bucket>>, StorageError> {
        Ok(self.buckets.get(key).map(|entry| Arc::clone(entry.value())))
    }

    fn get_or_insert(
        &self,
        key: &str,
        make: &dyn Fn() -> Bucket,
    ) -> Result<Arc<Bucket>, StorageError> {
        if let Some(entry) = self.buckets.get(key) {
            return Ok(Arc::clone(entry.value()));
        }
        let entry = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(make()));
        Ok(Arc::clone(entry.value()))
    }

    fn save(&self, bucket: Arc<Bucket>) -> Result<(), StorageError> {
        self.buckets.insert(bucket.key().to_string(), bucket);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.buckets.remove(key);
        Ok(())
    }

    fn evict_idle(&self, cutoff_nanos: u64) -> Result<usize, StorageError> {
        let mut removed = 0;
        // retain holds the shard lock, so a handle count of one means no
        // caller has the bucket and none can fetch it before it is gone
        self.buckets.retain(|_, bucket| {
            let keep = Arc::strong_count(bucket) > 1 || !bucket.is_expired_at(cutoff_nanos);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
