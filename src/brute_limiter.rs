// src/brute_limiter.rs

// brute-limiter: admission control for authentication attempts.

// dependencies
use crate::bucket::{Bucket, BucketKind};
use crate::clock::{Clock, SystemClock};
use crate::config::BruteLimiterConfig;
use crate::errors::{BruteLimiterError, StorageError};
use crate::net::{ListType, Net};
use crate::storage::{BucketStorage, NetStorage};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The main BruteLimiter model.
/// B stores buckets, N stores allow/deny networks.
/// C is the clock type, defaulting to SystemClock.
/// The limiter holds no mutable state of its own; all synchronization lives
/// in the storage backends and in each bucket's lock.
#[derive(Debug)]
pub struct BruteLimiter<B, N, C = SystemClock>
where
    B: BucketStorage,
    N: NetStorage,
    C: Clock,
{
    config: BruteLimiterConfig,
    buckets: B,
    nets: N,
    clock: C,
}

// methods for the BruteLimiter type
impl<B, N, C> BruteLimiter<B, N, C>
where
    B: BucketStorage,
    N: NetStorage,
    C: Clock,
{
    // method to create a new brute limiter from a config object
    pub fn with_config(
        config: BruteLimiterConfig,
        buckets: B,
        nets: N,
        clock: C,
    ) -> Result<Self, BruteLimiterError> {
        config.validate()?;
        Ok(Self {
            config,
            buckets,
            nets,
            clock,
        })
    }

    pub fn config(&self) -> &BruteLimiterConfig {
        &self.config
    }

    pub fn bucket_storage(&self) -> &B {
        &self.buckets
    }

    pub fn net_storage(&self) -> &N {
        &self.nets
    }

    /// Decide whether an authentication attempt may proceed.
    ///
    /// The allow list wins over the deny list; neither touches a bucket.
    /// Otherwise one token is taken from the login, password and address
    /// buckets in that order, stopping at the first empty one.
    /// `Err` means no decision could be made and must not be read as `false`.
    pub fn allow(
        &self,
        login: &str,
        password: &str,
        address: u32,
    ) -> Result<bool, BruteLimiterError> {
        if self.is_listed(address, ListType::Allow)? {
            debug!(address = %Ipv4Addr::from(address), "address is allow-listed");
            return Ok(true);
        }

        if self.is_listed(address, ListType::Deny)? {
            debug!(address = %Ipv4Addr::from(address), "address is deny-listed");
            return Ok(false);
        }

        let now = self.now()?;

        if !self.consume(BucketKind::Login, login, now)? {
            return Ok(false);
        }
        if !self.consume(BucketKind::Password, password, now)? {
            return Ok(false);
        }
        if !self.consume(BucketKind::Address, &address.to_string(), now)? {
            return Ok(false);
        }

        debug!(login, address = %Ipv4Addr::from(address), "attempt allowed");
        Ok(true)
    }

    pub fn allow_ipv4(
        &self,
        login: &str,
        password: &str,
        address: Ipv4Addr,
    ) -> Result<bool, BruteLimiterError> {
        self.allow(login, password, u32::from(address))
    }

    /// Refill the login and address buckets of a user.
    /// Both buckets must already exist.
    pub fn reset(&self, login: &str, address: u32) -> Result<(), BruteLimiterError> {
        let login_key = BucketKind::Login.key_for(login);
        let address_id = address.to_string();
        let address_key = BucketKind::Address.key_for(&address_id);

        // both reads happen before either absence is reported, so a storage
        // failure always wins over a missing bucket
        let login_bucket = self.fetch_for_reset(&login_key)?;
        let address_bucket = self.fetch_for_reset(&address_key)?;

        let login_bucket = login_bucket.ok_or_else(|| BruteLimiterError::BucketNotFound {
            kind: BucketKind::Login,
            identifier: login.to_string(),
        })?;
        let address_bucket = address_bucket.ok_or_else(|| {
            BruteLimiterError::BucketNotFound {
                kind: BucketKind::Address,
                identifier: address_id.clone(),
            }
        })?;

        let now = self.now()?;
        login_bucket.reset_at(now);
        address_bucket.reset_at(now);

        self.save_for_reset(login_key, login_bucket)?;
        self.save_for_reset(address_key, address_bucket)?;

        info!(login, address = %Ipv4Addr::from(address), "buckets reset");
        Ok(())
    }

    /// Add the network containing `address` to a list.
    ///
    /// An existing entry with the same base address is widened when the
    /// request is broader, and left alone otherwise.
    pub fn add_to_list(
        &self,
        address: u32,
        prefix_len: u8,
        list: ListType,
    ) -> Result<(), BruteLimiterError> {
        let requested = Net::new(address, prefix_len);
        let add_err = |source: StorageError| {
            warn!(%list, net = %requested, error = %source, "failed to add network");
            BruteLimiterError::AddToList { list, source }
        };

        let net = match self.nets.get(requested.address(), list).map_err(add_err)? {
            Some(mut existing) => {
                if !existing.widen(requested.prefix_len()) {
                    debug!(%list, existing = %existing, net = %requested, "network already covered");
                    return Ok(());
                }
                existing
            }
            None => requested,
        };

        self.nets.save(net, list).map_err(add_err)?;
        info!(%list, %net, "network added");
        Ok(())
    }

    /// Remove the exact (base address, prefix length) entry from a list.
    pub fn remove_from_list(
        &self,
        address: u32,
        prefix_len: u8,
        list: ListType,
    ) -> Result<(), BruteLimiterError> {
        let net = Net::new(address, prefix_len);
        self.nets
            .delete(net.address(), net.prefix_len(), list)
            .map_err(|source| {
                warn!(%list, %net, error = %source, "failed to remove network");
                BruteLimiterError::RemoveFromList { list, source }
            })?;
        info!(%list, %net, "network removed");
        Ok(())
    }

    pub fn list_entries(&self, list: ListType) -> Result<Vec<Net>, BruteLimiterError> {
        self.nets
            .list(list)
            .map_err(|source| BruteLimiterError::ListEntries { list, source })
    }

    /// Drop buckets whose window ended more than `max_idle` ago.
    ///
    /// Such a bucket would refill on its next access anyway, so evicting it
    /// does not change any decision. Returns how many buckets were removed.
    pub fn cleanup_stale_buckets(&self, max_idle: Duration) -> Result<usize, BruteLimiterError> {
        let now = self.now()?;
        let max_idle_nanos = u64::try_from(max_idle.as_nanos()).unwrap_or(u64::MAX);
        let cutoff = now.saturating_sub(max_idle_nanos);

        let removed = self.buckets.evict_idle(cutoff).map_err(|source| {
            warn!(error = %source, "failed to evict idle buckets");
            BruteLimiterError::EvictBuckets { source }
        })?;
        debug!(removed, "evicted idle buckets");
        Ok(removed)
    }

    fn now(&self) -> Result<u64, BruteLimiterError> {
        self.clock.now().map_err(|e| {
            warn!(error = %e, "clock unavailable");
            BruteLimiterError::Clock(e)
        })
    }

    fn is_listed(&self, address: u32, list: ListType) -> Result<bool, BruteLimiterError> {
        let nets = self.nets.list(list).map_err(|source| {
            warn!(%list, error = %source, "failed to read list");
            BruteLimiterError::CheckList { list, source }
        })?;
        Ok(nets.iter().any(|net| net.contains(address)))
    }

    // take one token from the bucket of `identifier`, creating it on first sight
    fn consume(
        &self,
        kind: BucketKind,
        identifier: &str,
        now: u64,
    ) -> Result<bool, BruteLimiterError> {
        let key = kind.key_for(identifier);
        let check_err = |key: &str, source: StorageError| {
            warn!(%kind, key, error = %source, "bucket storage failed");
            BruteLimiterError::CheckBucket {
                kind,
                key: key.to_string(),
                source,
            }
        };

        let bucket = self
            .buckets
            .get_or_insert(&key, &|| self.config.new_bucket(kind, key.clone(), now))
            .map_err(|e| check_err(&key, e))?;

        if !bucket.try_consume_at(now) {
            debug!(%kind, key = %key, "bucket exhausted");
            return Ok(false);
        }

        self.buckets.save(bucket).map_err(|e| check_err(&key, e))?;
        Ok(true)
    }

    fn fetch_for_reset(
        &self,
        key: &str,
    ) -> Result<Option<Arc<Bucket>>, BruteLimiterError> {
        self.buckets.get(key).map_err(|source| {
            warn!(key, error = %source, "failed to load bucket for reset");
            BruteLimiterError::ResetBucket {
                key: key.to_string(),
                source,
            }
        })
    }

    fn save_for_reset(
        &self,
        key: String,
        bucket: Arc<Bucket>,
    ) -> Result<(), BruteLimiterError> {
        self.buckets.save(bucket).map_err(|source| {
            warn!(key = %key, error = %source, "failed to save reset bucket");
            BruteLimiterError::ResetBucket { key, source }
        })
    }
}
