// src/storage/net_store.rs

// in-memory network storage, one lock per list

// dependencies
use super::NetStorage;
use crate::errors::StorageError;
use crate::net::{ListType, Net};
use parking_lot::RwLock;
use std::collections::HashMap;

type Partition = RwLock<HashMap<u32, Net>>;

/// In-memory net store keyed by base address.
/// Each list sits behind its own `RwLock`, so checking the allow list never
/// waits on a writer to the deny list.
#[derive(Debug, Default)]
pub struct MemoryNetStorage {
    allow: Partition,
    deny: Partition,
}

impl MemoryNetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, list: ListType) -> &Partition {
        match list {
            ListType::Allow => &self.allow,
            ListType::Deny => &self.deny,
        }
    }
}

impl NetStorage for MemoryNetStorage {
    fn get(&self, address: u32, list: ListType) -> Result<Option<Net>, StorageError> {
        Ok(self.partition(list).read().get(&address).copied())
    }

    fn save(&self, net: Net, list: ListType) -> Result<(), StorageError> {
        self.partition(list).write().insert(net.address(), net);
        Ok(())
    }

    fn list(&self, list: ListType) -> Result<Vec<Net>, StorageError> {
        Ok(self.partition(list).read().values().copied().collect())
    }

    fn delete(&self, address: u32, prefix_len: u8, list: ListType) -> Result<(), StorageError> {
        let mut nets = self.partition(list).write();
        if nets
            .get(&address)
            .is_some_and(|net| net.prefix_len() == prefix_len)
        {
            nets.remove(&address);
        }
        Ok(())
    }
}
