//! Storage behind the portals.
//!
//! Two seams keep the state machine independent of where data lives:
//!
//! - [`KeyValueStore`] - the persistence slot holding the serialized active
//!   identity (browser local storage in a web front end)
//! - [`AccountStore`] - the account directory holding every registered
//!   applicant and its password hash
//!
//! Both are synchronous and take `&self`; implementations guard their state
//! internally so one store can be shared by several session contexts.

pub mod accounts;
pub mod kv;

use std::sync::PoisonError;

use thiserror::Error;

pub use accounts::{AccountRecord, AccountStore, MemoryAccountStore};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., an email registered twice for one role).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A key contains characters the store cannot represent.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A thread panicked while holding the store's lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
