// src/config.rs

//! Configuration types for the brute limiter

// dependencies
use crate::bucket::{Bucket, BucketKind};
use crate::errors::BruteLimiterError;
use std::time::Duration;

/// Window length used when none is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Attempts allowed per window for each bucket class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketCapacities {
    pub login: u64,
    pub password: u64,
    pub address: u64,
}

impl BucketCapacities {
    pub fn for_kind(&self, kind: BucketKind) -> u64 {
        match kind {
            BucketKind::Login => self.login,
            BucketKind::Password => self.password,
            BucketKind::Address => self.address,
        }
    }
}

/// Configuration for brute limiter behavior
#[derive(Debug, Clone)]
pub struct BruteLimiterConfig {
    pub(crate) capacities: BucketCapacities,
    pub(crate) window: Duration,
}

impl BruteLimiterConfig {
    /// Create a new configuration with per-class capacities and the default window
    pub fn new(login: u64, password: u64, address: u64) -> Self {
        Self {
            capacities: BucketCapacities {
                login,
                password,
                address,
            },
            window: DEFAULT_WINDOW,
        }
    }

    /// Builder-style: set login bucket capacity
    pub fn login(mut self, capacity: u64) -> Self {
        self.capacities.login = capacity;
        self
    }

    /// Builder-style: set password bucket capacity
    pub fn password(mut self, capacity: u64) -> Self {
        self.capacities.password = capacity;
        self
    }

    /// Builder-style: set address bucket capacity
    pub fn address(mut self, capacity: u64) -> Self {
        self.capacities.address = capacity;
        self
    }

    /// Builder-style: set the refill window
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn capacities(&self) -> BucketCapacities {
        self.capacities
    }

    pub fn window_duration(&self) -> Duration {
        self.window
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), BruteLimiterError> {
        if self.window.is_zero() {
            return Err(BruteLimiterError::InvalidWindow);
        }
        Ok(())
    }

    /// Fresh bucket for a key that has not been seen before.
    pub fn new_bucket(&self, kind: BucketKind, key: String, now_nanos: u64) -> Bucket {
        Bucket::new(key, self.capacities.for_kind(kind), self.window, now_nanos)
    }
}

impl From<BucketCapacities> for BruteLimiterConfig {
    fn from(capacities: BucketCapacities) -> Self {
        Self {
            capacities,
            window: DEFAULT_WINDOW,
        }
    }
}
