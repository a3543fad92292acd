// tests/limiter/fixtures/failing_storage.rs

// storage wrappers that fail on demand

// dependencies
use brute_limiter::{
    Bucket, BucketStorage, ListType, MemoryBucketStorage, MemoryNetStorage, Net, NetStorage,
    StorageError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

// Fires on the n-th call after being armed, then disarms itself.
#[derive(Debug, Default)]
pub struct Trigger(AtomicUsize);

impl Trigger {
    pub fn fail_next_call(&self) {
        self.fail_on_call(1);
    }

    pub fn fail_on_call(&self, n: usize) {
        self.0.store(n, Ordering::SeqCst);
    }

    fn fire(&self) -> Result<(), StorageError> {
        let prev = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1));
        match prev {
            Ok(1) => Err(StorageError::Unavailable("injected failure".to_string())),
            _ => Ok(()),
        }
    }
}

// `get` also guards `get_or_insert`
#[derive(Debug, Default)]
pub struct FailingBucketStorage {
    pub inner: MemoryBucketStorage,
    pub get: Trigger,
    pub save: Trigger,
    pub evict: Trigger,
}

impl BucketStorage for FailingBucketStorage {
    fn get(&self, key: &str) -> Result<Option<Arc<Bucket>>, StorageError> {
        self.get.fire()?;
        self.inner.get(key)
    }

    fn get_or_insert(
        &self,
        key: &str,
        make: &dyn Fn() -> Bucket,
    ) -> Result<Arc<Bucket>, StorageError> {
        self.get.fire()?;
        self.inner.get_or_insert(key, make)
    }

    fn save(&self, bucket: Arc<Bucket>) -> Result<(), StorageError> {
        self.save.fire()?;
        self.inner.save(bucket)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key)
    }

    fn evict_idle(&self, cutoff_nanos: u64) -> Result<usize, StorageError> {
        self.evict.fire()?;
        self.inner.evict_idle(cutoff_nanos)
    }
}

#[derive(Debug, Default)]
pub struct FailingNetStorage {
    pub inner: MemoryNetStorage,
    pub get: Trigger,
    pub save: Trigger,
    pub list: Trigger,
    pub delete: Trigger,
}

impl NetStorage for FailingNetStorage {
    fn get(&self, address: u32, list: ListType) -> Result<Option<Net>, StorageError> {
        self.get.fire()?;
        self.inner.get(address, list)
    }

    fn save(&self, net: Net, list: ListType) -> Result<(), StorageError> {
        self.save.fire()?;
        self.inner.save(net, list)
    }

    fn list(&self, list: ListType) -> Result<Vec<Net>, StorageError> {
        self.list.fire()?;
        self.inner.list(list)
    }

    fn delete(&self, address: u32, prefix_len: u8, list: ListType) -> Result<(), StorageError> {
        self.delete.fire()?;
        self.inner.delete(address, prefix_len, list)
    }
}

// Widens the gap between concurrent callers reaching the inner store.
#[derive(Debug, Default)]
pub struct SlowBucketStorage {
    pub inner: MemoryBucketStorage,
    pub latency: Duration,
}

impl BucketStorage for SlowBucketStorage {
    fn get(&self, key: &str) -> Result<Option<Arc<Bucket>>, StorageError> {
        thread::sleep(self.latency);
        self.inner.get(key)
    }

    fn get_or_insert(
        &self,
        key: &str,
        make: &dyn Fn() -> Bucket,
    ) -> Result<Arc<Bucket>, StorageError> {
        thread::sleep(self.latency);
        self.inner.get_or_insert(key, make)
    }

    fn save(&self, bucket: Arc<Bucket>) -> Result<(), StorageError> {
        thread::sleep(self.latency);
        self.inner.save(bucket)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key)
    }

    fn evict_idle(&self, cutoff_nanos: u64) -> Result<usize, StorageError> {
        self.inner.evict_idle(cutoff_nanos)
    }
}
