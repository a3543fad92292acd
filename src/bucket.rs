// src/bucket.rs

// token bucket with a fixed refill window

// dependencies
use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

/// The class of identifier a bucket counts attempts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    Login,
    Password,
    Address,
}

impl BucketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKind::Login => "login",
            BucketKind::Password => "password",
            BucketKind::Address => "address",
        }
    }

    /// Storage key for `identifier` within this class, e.g. `login:alice` or
    /// `address:3232235521` (addresses use their decimal `u32` form).
    /// Classes are namespaced so a login and a password spelled the same way
    /// never share a bucket. Backends see these prefixed keys, not the bare
    /// identifiers.
    pub fn key_for(&self, identifier: &str) -> String {
        format!("{}:{}", self.as_str(), identifier)
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct BucketState {
    free_space: u64,
    next_reset_nanos: u64,
}

/// A token bucket identified by a string key.
///
/// `capacity` tokens are available per window. Refill is lazy: the first
/// access at or after `next_reset` restores the bucket to full and starts a
/// new window. Every mutation happens under the bucket's own lock, so two
/// callers racing for the last token cannot both win.
#[derive(Debug)]
pub struct Bucket {
    key: String,
    capacity: u64,
    window_nanos: u64,
    state: Mutex<BucketState>,
}

impl Bucket {
    /// Create a full bucket whose first window ends at `now_nanos + window`.
    pub fn new(key: impl Into<String>, capacity: u64, window: Duration, now_nanos: u64) -> Self {
        let window_nanos = u64::try_from(window.as_nanos()).unwrap_or(u64::MAX);
        Self {
            key: key.into(),
            capacity,
            window_nanos,
            state: Mutex::new(BucketState {
                free_space: capacity,
                next_reset_nanos: now_nanos.saturating_add(window_nanos),
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        Duration::from_nanos(self.window_nanos)
    }

    pub fn free_space(&self) -> u64 {
        self.state.lock().free_space
    }

    pub fn next_reset_nanos(&self) -> u64 {
        self.state.lock().next_reset_nanos
    }

    /// Take one token at instant `now_nanos`.
    ///
    /// Returns `false` without touching the counter when the bucket is empty.
    pub fn try_consume_at(&self, now_nanos: u64) -> bool {
        let mut state = self.state.lock();

        if now_nanos >= state.next_reset_nanos {
            state.free_space = self.capacity;
            state.next_reset_nanos = now_nanos.saturating_add(self.window_nanos);
        }

        if state.free_space < 1 {
            return false;
        }

        state.free_space -= 1;
        true
    }

    /// Refill to capacity and start a new window at `now_nanos`.
    pub fn reset_at(&self, now_nanos: u64) {
        let mut state = self.state.lock();
        state.free_space = self.capacity;
        state.next_reset_nanos = now_nanos.saturating_add(self.window_nanos);
    }

    /// True when the bucket would be refilled by an access at `now_nanos`.
    pub(crate) fn is_expired_at(&self, now_nanos: u64) -> bool {
        now_nanos >= self.state.lock().next_reset_nanos
    }
}
