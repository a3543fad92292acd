// src/lib.rs

//! # Brute Limiter
//!
//! Admission control for authentication attempts. Each attempt is judged by
//! a CIDR allow-list, a CIDR deny-list and three token buckets (login,
//! password, origin address).
//!
//! ## Quick Example
//!
//! ```rust
//! use brute_limiter::{
//!     BruteLimiter, BruteLimiterConfig, ListType, MemoryBucketStorage, MemoryNetStorage,
//!     SystemClock,
//! };
//!
//! let config = BruteLimiterConfig::new(10, 100, 1000);
//! let limiter = BruteLimiter::with_config(
//!     config,
//!     MemoryBucketStorage::new(),
//!     MemoryNetStorage::new(),
//!     SystemClock,
//! )
//! .unwrap();
//!
//! limiter.add_to_list(0x0A00_0000, 8, ListType::Deny).unwrap();
//!
//! match limiter.allow("alice", "hunter2", 0xC0A8_0001) {
//!     Ok(true) => println!("attempt may proceed"),
//!     Ok(false) => println!("attempt rejected"),
//!     Err(e) => println!("could not decide: {}", e),
//! }
//! ```

// private modules
mod brute_limiter;
mod bucket;
mod clock;
mod config;
mod errors;
mod net;
mod storage;

// public API exports
pub use brute_limiter::BruteLimiter;
pub use bucket::{Bucket, BucketKind};
pub use clock::{Clock, ClockError, SystemClock};
pub use config::{BruteLimiterConfig, BucketCapacities, DEFAULT_WINDOW};
pub use errors::{BruteLimiterError, StorageError};
pub use net::{ListType, Net, prefix_mask};
pub use storage::{BucketStorage, MemoryBucketStorage, MemoryNetStorage, NetStorage};
