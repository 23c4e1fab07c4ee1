//! Integration tests for the food waste portals.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foodwaste-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `ngo_approval` - register, submit profile, admin approval, refresh
//! - `registration` - registration and login failures
//! - `restaurant_review` - rejection and review permissions
//! - `session_persistence` - slot contents across restarts
//! - `transitions` - login and registration refused outside the anonymous state
//!
//! Every scenario runs against in-memory stores built by [`TestContext`],
//! except the persistence tests which use a file-backed slot.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::SecretString;

use foodwaste_core::{ADMIN_EMAIL, ADMIN_PASSWORD, Role};
use foodwaste_portal::models::{Identity, RegistrationForm};
use foodwaste_portal::services::{Notification, Portal, RecordingNotifier, SessionStore};
use foodwaste_portal::store::{KeyValueStore, MemoryAccountStore, MemoryKeyValueStore};
use foodwaste_portal::{AppState, PortalConfig, PortalError};

/// Shared state for one scenario: the app, its notifier and the account
/// directory, so tests can assert on all three.
pub struct TestContext {
    pub state: AppState,
    pub accounts: Arc<MemoryAccountStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    /// Context with an empty review queue.
    ///
    /// # Errors
    ///
    /// Returns `PortalError` if the app state cannot be built.
    pub fn new() -> Result<Self, PortalError> {
        Self::with_config(PortalConfig {
            seed_demo_requests: false,
            ..PortalConfig::default()
        })
    }

    /// Context whose queue holds the four demo applications.
    ///
    /// # Errors
    ///
    /// Returns `PortalError` if the app state cannot be built.
    pub fn with_demo_requests() -> Result<Self, PortalError> {
        Self::with_config(PortalConfig::default())
    }

    fn with_config(config: PortalConfig) -> Result<Self, PortalError> {
        let accounts = Arc::new(MemoryAccountStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let state = AppState::new(config, accounts.clone(), notifier.clone())?;
        Ok(Self {
            state,
            accounts,
            notifier,
        })
    }

    /// A new client with its own in-memory slot.
    #[must_use]
    pub fn client(&self) -> Client {
        self.client_with_slot(Arc::new(MemoryKeyValueStore::new()))
    }

    /// A new client backed by `slot`.
    #[must_use]
    pub fn client_with_slot(&self, slot: Arc<dyn KeyValueStore>) -> Client {
        Client {
            session: self.state.open_session(slot),
        }
    }

    #[must_use]
    pub fn portal(&self, role: Role) -> Portal {
        self.state.portal(role)
    }

    /// Drain the notifications raised so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.take()
    }

    /// Log a fresh client in as the administrator.
    ///
    /// # Errors
    ///
    /// Returns `PortalError` if the admin login is refused.
    pub fn admin(&self) -> Result<(Client, Identity), PortalError> {
        let mut client = self.client();
        let identity = self.portal(Role::Admin).login(
            &mut client.session,
            ADMIN_EMAIL,
            &SecretString::from(ADMIN_PASSWORD),
        )?;
        Ok((client, identity))
    }
}

/// One logical client: a browser tab in the web front end.
pub struct Client {
    pub session: SessionStore,
}

impl Client {
    /// Register through `portal` with matching password fields.
    ///
    /// # Errors
    ///
    /// Returns `PortalError` if registration is refused.
    pub fn register(
        &mut self,
        portal: &Portal,
        email: &str,
        password: &str,
    ) -> Result<Identity, PortalError> {
        portal.register(
            &mut self.session,
            &RegistrationForm::new(email, password, password),
        )
    }
}
