// src/storage/mod.rs

//! Storage contracts for buckets and networks, plus in-memory backends.
//!
//! Every method must be safe to call from many threads at once. A `save`
//! racing a `get` for the same key must never expose a half-written value.
//! Backends report failures as [`StorageError`]; the limiter surfaces them
//! once and never retries.

// dependencies
use crate::bucket::Bucket;
use crate::errors::StorageError;
use crate::net::{ListType, Net};
use std::sync::Arc;

mod bucket_store;
mod net_store;

pub use bucket_store::MemoryBucketStorage;
pub use net_store::MemoryNetStorage;

/// Keyed store of buckets.
///
/// Buckets are shared handles: a `get` hands out the same bucket that was
/// saved, so consumption on it is serialized by the bucket's own lock.
pub trait BucketStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Arc<Bucket>>, StorageError>;

    /// Bucket stored under `key`, inserting `make()` first if there is none.
    /// Check and insert are one atomic step: concurrent callers for the same
    /// absent key all receive the same bucket.
    fn get_or_insert(
        &self,
        key: &str,
        make: &dyn Fn() -> Bucket,
    ) -> Result<Arc<Bucket>, StorageError>;

    /// Insert or overwrite by `bucket.key()`.
    fn save(&self, bucket: Arc<Bucket>) -> Result<(), StorageError>;

    /// Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Drop every bucket whose window ended at or before `cutoff_nanos` and
    /// that no caller is currently holding. Returns how many were removed.
    fn evict_idle(&self, cutoff_nanos: u64) -> Result<usize, StorageError>;
}

/// Store of networks, partitioned by list type.
///
/// The allow and deny partitions lock independently.
pub trait NetStorage: Send + Sync {
    /// Entry whose base address is exactly `address`.
    fn get(&self, address: u32, list: ListType) -> Result<Option<Net>, StorageError>;

    /// Insert or overwrite by `net.address()` within the partition.
    fn save(&self, net: Net, list: ListType) -> Result<(), StorageError>;

    /// All entries of the partition, in no particular order.
    fn list(&self, list: ListType) -> Result<Vec<Net>, StorageError>;

    /// Remove the entry only when both address and prefix length match.
    fn delete(&self, address: u32, prefix_len: u8, list: ListType) -> Result<(), StorageError>;
}

impl<T: BucketStorage + ?Sized> BucketStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Arc<Bucket>>, StorageError> {
        (**self).get(key)
    }

    fn get_or_insert(
        &self,
        key: &str,
        make: &dyn Fn() -> Bucket,
    ) -> Result<Arc<Bucket>, StorageError> {
        (**self).get_or_insert(key, make)
    }

    fn save(&self, bucket: Arc<Bucket>) -> Result<(), StorageError> {
        (**self).save(bucket)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn evict_idle(&self, cutoff_nanos: u64) -> Result<usize, StorageError> {
        (**self).evict_idle(cutoff_nanos)
    }
}

impl<T: NetStorage + ?Sized> NetStorage for Arc<T> {
    fn get(&self, address: u32, list: ListType) -> Result<Option<Net>, StorageError> {
        (**self).get(address, list)
    }

    fn save(&self, net: Net, list: ListType) -> Result<(), StorageError> {
        (**self).save(net, list)
    }

    fn list(&self, list: ListType) -> Result<Vec<Net>, StorageError> {
        (**self).list(list)
    }

    fn delete(&self, address: u32, prefix_len: u8, list: ListType) -> Result<(), StorageError> {
        (**self).delete(address, prefix_len, list)
    }
}
