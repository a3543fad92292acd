// src/errors.rs

// error handling for the brute limiter

// dependencies
use thiserror::Error;

use crate::bucket::BucketKind;
use crate::clock::ClockError;
use crate::net::ListType;

/// Failure of a bucket or net store to complete a read or write.
///
/// The in-memory stores never produce one; the type exists so that other
/// backends can report outages through the same contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Error type for every BruteLimiter operation.
///
/// An error means the limiter could not decide. It must never be read as a
/// rejection: doing so turns a storage outage into a lock-out (or, on the
/// other branch, into unlimited attempts).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BruteLimiterError {
    #[error("window duration must be positive")]
    InvalidWindow,

    #[error("failed to check address in {list}")]
    CheckList {
        list: ListType,
        #[source]
        source: StorageError,
    },

    #[error("failed to check {kind} bucket '{key}'")]
    CheckBucket {
        kind: BucketKind,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to reset bucket '{key}'")]
    ResetBucket {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to reset buckets: {kind} bucket '{identifier}' not found")]
    BucketNotFound { kind: BucketKind, identifier: String },

    #[error("failed to add network to {list}")]
    AddToList {
        list: ListType,
        #[source]
        source: StorageError,
    },

    #[error("failed to remove network from {list}")]
    RemoveFromList {
        list: ListType,
        #[source]
        source: StorageError,
    },

    #[error("failed to list networks of {list}")]
    ListEntries {
        list: ListType,
        #[source]
        source: StorageError,
    },

    #[error("failed to evict idle buckets")]
    EvictBuckets {
        #[source]
        source: StorageError,
    },

    #[error("clock error occurred")]
    Clock(#[from] ClockError),
}

impl BruteLimiterError {
    /// The underlying storage failure, if this error wraps one.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            BruteLimiterError::CheckList { source, .. }
            | BruteLimiterError::CheckBucket { source, .. }
            | BruteLimiterError::ResetBucket { source, .. }
            | BruteLimiterError::AddToList { source, .. }
            | BruteLimiterError::RemoveFromList { source, .. }
            | BruteLimiterError::ListEntries { source, .. }
            | BruteLimiterError::EvictBuckets { source } => Some(source),
            _ => None,
        }
    }

    pub fn is_storage_failure(&self) -> bool {
        self.storage_error().is_some()
    }
}
