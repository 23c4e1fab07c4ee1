//! Account directory for registered applicants.
//!
//! The directory holds the authoritative copy of every NGO and restaurant
//! identity together with its password hash. Session contexts read from it
//! on login and refresh; the admin review queue writes approval decisions
//! into it.

use std::collections::HashMap;
use std::sync::RwLock;

use foodwaste_core::{Email, IdentityId, Profile, Role};

use super::RepositoryError;
use crate::models::Identity;

/// A registered account: the identity plus its Argon2 password hash (PHC string).
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub identity: Identity,
    pub password_hash: String,
}

/// Storage for registered applicant accounts.
///
/// Accounts are unique per `(role, email)`: the same address may register
/// once as an NGO and once as a restaurant.
pub trait AccountStore: Send + Sync {
    /// Add a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the role/email pair is taken.
    fn insert(&self, record: AccountRecord) -> Result<(), RepositoryError>;

    /// Delete an account. Used to undo a registration that could not complete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    fn remove(&self, id: IdentityId) -> Result<(), RepositoryError>;

    /// Get the current identity of an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    fn get(&self, id: IdentityId) -> Result<Option<Identity>, RepositoryError>;

    /// Look up an account by role and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    fn find(&self, role: Role, email: &Email) -> Result<Option<AccountRecord>, RepositoryError>;

    /// Replace an account's profile and return the updated identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    fn set_profile(
        &self,
        id: IdentityId,
        profile: Option<Profile>,
    ) -> Result<Identity, RepositoryError>;

    /// Set an account's approval flag and return the updated identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    fn set_approved(&self, id: IdentityId, approved: bool) -> Result<Identity, RepositoryError>;
}

#[derive(Debug, Default)]
struct Accounts {
    records: HashMap<IdentityId, AccountRecord>,
    by_email: HashMap<(Role, Email), IdentityId>,
}

/// In-memory account directory.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Accounts>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Poisoned` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.inner.read()?.records.len())
    }

    /// Whether no account has been registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Poisoned` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn update<F>(&self, id: IdentityId, apply: F) -> Result<Identity, RepositoryError>
    where
        F: FnOnce(&mut Identity),
    {
        let mut accounts = self.inner.write()?;
        let record = accounts
            .records
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        apply(&mut record.identity);
        Ok(record.identity.clone())
    }
}

impl AccountStore for MemoryAccountStore {
    fn insert(&self, record: AccountRecord) -> Result<(), RepositoryError> {
        let mut accounts = self.inner.write()?;
        let key = (record.identity.role, record.identity.email.clone());

        if accounts.by_email.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "{} account already exists for {}",
                key.0, key.1
            )));
        }
        if accounts.records.contains_key(&record.identity.id) {
            return Err(RepositoryError::Conflict(format!(
                "identity {} already exists",
                record.identity.id
            )));
        }

        accounts.by_email.insert(key, record.identity.id);
        accounts.records.insert(record.identity.id, record);
        Ok(())
    }

    fn remove(&self, id: IdentityId) -> Result<(), RepositoryError> {
        let mut accounts = self.inner.write()?;
        let record = accounts.records.remove(&id).ok_or(RepositoryError::NotFound)?;
        accounts
            .by_email
            .remove(&(record.identity.role, record.identity.email));
        Ok(())
    }

    fn get(&self, id: IdentityId) -> Result<Option<Identity>, RepositoryError> {
        Ok(self
            .inner
            .read()?
            .records
            .get(&id)
            .map(|record| record.identity.clone()))
    }

    fn find(&self, role: Role, email: &Email) -> Result<Option<AccountRecord>, RepositoryError> {
        let accounts = self.inner.read()?;
        Ok(accounts
            .by_email
            .get(&(role, email.clone()))
            .and_then(|id| accounts.records.get(id))
            .cloned())
    }

    fn set_profile(
        &self,
        id: IdentityId,
        profile: Option<Profile>,
    ) -> Result<Identity, RepositoryError> {
        self.update(id, |identity| identity.profile = profile)
    }

    fn set_approved(&self, id: IdentityId, approved: bool) -> Result<Identity, RepositoryError> {
        self.update(id, |identity| identity.is_approved = approved)
    }
}
