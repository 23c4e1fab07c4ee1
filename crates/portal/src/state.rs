//! Application state shared by every session context.

use std::sync::Arc;

use foodwaste_core::Role;

use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::services::{Notifier, Portal, RequestQueue, SessionStore};
use crate::store::{AccountStore, KeyValueStore};

/// Application state shared across all session contexts.
///
/// This struct is cheaply cloneable via `Arc` and owns the account directory,
/// the review queue and the notifier. Each logical client opens its own
/// [`SessionStore`] from it with a private persistence slot.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    accounts: Arc<dyn AccountStore>,
    queue: RequestQueue,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("queue", &self.inner.queue)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a new application state.
    ///
    /// The review queue is seeded with the demo applications when
    /// `config.seed_demo_requests` is set.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if seeding the queue fails.
    pub fn new(
        config: PortalConfig,
        accounts: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, PortalError> {
        let mut queue = RequestQueue::new(accounts.clone(), notifier.clone());
        if config.seed_demo_requests {
            queue = queue.with_demo_requests()?;
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                accounts,
                queue,
                notifier,
            }),
        })
    }

    /// Open a session context backed by `slot`, restoring any saved identity.
    #[must_use]
    pub fn open_session(&self, slot: Arc<dyn KeyValueStore>) -> SessionStore {
        SessionStore::open(slot, self.inner.accounts.clone())
    }

    /// The portal page for `role`, reporting to the shared notifier.
    #[must_use]
    pub fn portal(&self, role: Role) -> Portal {
        Portal::new(role, self.inner.notifier.clone())
    }

    /// Get a reference to the admin review queue.
    #[must_use]
    pub fn queue(&self) -> &RequestQueue {
        &self.inner.queue
    }
}
