//! Approval state machine.
//!
//! Each portal derives what it shows from the session alone:
//!
//! ```text
//! Anonymous --register--> AwaitingProfile --submit_profile--> PendingReview
//!     |                                                            |
//!     +--login (approved)--> Active <------ admin approval --------+
//! ```
//!
//! The state is a pure function of whether the active identity's role
//! matches the portal, its approval flag, and whether it has a profile. It is
//! recomputed on every read and never stored, so it cannot drift from the
//! session.

use core::fmt;
use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use foodwaste_core::{Profile, Role, Route};

use crate::error::PortalError;
use crate::models::{Identity, PendingRequest, RegistrationForm};
use crate::services::notify::{Notification, Notifier};
use crate::services::request_queue::RequestQueue;
use crate::services::session::SessionStore;

/// What a portal shows for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalState {
    /// No identity, or an identity of another role.
    Anonymous,
    /// Registered but no profile submitted yet.
    AwaitingProfile,
    /// Profile submitted, waiting for an admin decision.
    PendingReview,
    /// Approved: the role's dashboard.
    Active,
}

/// A user action a portal may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Login,
    Register,
    SubmitProfile,
    Logout,
}

impl PortalState {
    /// Derive the state of the `portal` page for the active identity.
    #[must_use]
    pub fn derive(portal: Role, identity: Option<&Identity>) -> Self {
        match identity {
            Some(identity) if identity.role == portal => {
                Self::from_flags(true, identity.is_approved, identity.has_profile())
            }
            _ => Self::Anonymous,
        }
    }

    /// The state table itself.
    #[must_use]
    pub const fn from_flags(role_matches: bool, is_approved: bool, has_profile: bool) -> Self {
        match (role_matches, is_approved, has_profile) {
            (false, _, _) => Self::Anonymous,
            (true, true, _) => Self::Active,
            (true, false, false) => Self::AwaitingProfile,
            (true, false, true) => Self::PendingReview,
        }
    }

    /// Transitions offered in this state on the `portal` page.
    #[must_use]
    pub const fn transitions(self, portal: Role) -> &'static [Transition] {
        match self {
            Self::Anonymous if portal.is_applicant() => &[Transition::Login, Transition::Register],
            Self::Anonymous => &[Transition::Login],
            Self::AwaitingProfile => &[Transition::SubmitProfile, Transition::Logout],
            Self::PendingReview | Self::Active => &[Transition::Logout],
        }
    }

    #[must_use]
    pub fn allows(self, portal: Role, transition: Transition) -> bool {
        self.transitions(portal).contains(&transition)
    }
}

impl fmt::Display for PortalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::AwaitingProfile => write!(f, "awaiting profile"),
            Self::PendingReview => write!(f, "pending review"),
            Self::Active => write!(f, "active"),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
            Self::SubmitProfile => write!(f, "submit profile"),
            Self::Logout => write!(f, "logout"),
        }
    }
}

/// One role's portal page: the transitions a user drives, each reported
/// through the notifier.
pub struct Portal {
    role: Role,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portal")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl Portal {
    #[must_use]
    pub fn new(role: Role, notifier: Arc<dyn Notifier>) -> Self {
        Self { role, notifier }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn route(&self) -> Route {
        Route::for_role(self.role)
    }

    /// Current state of this portal for `session`.
    #[must_use]
    pub fn state(&self, session: &SessionStore) -> PortalState {
        PortalState::derive(self.role, session.current())
    }

    /// Log in to this portal's role.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::InvalidTransition` unless the portal is
    /// [`PortalState::Anonymous`]; the session is left as it was. Otherwise
    /// see [`SessionStore::login`].
    pub fn login(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, PortalError> {
        let result = self
            .guard(session, Transition::Login)
            .and_then(|()| session.login(email, password, self.role));
        let success = if self.role == Role::Admin {
            Notification::new("Admin Login Successful", "Welcome to the admin portal.")
        } else {
            Notification::new("Login Successful", "Welcome back!")
        };
        self.report(result, success)
    }

    /// Register for this portal's role.
    ///
    /// The two password fields are compared before any account is touched.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::InvalidTransition` unless the portal is
    /// [`PortalState::Anonymous`], and `PortalError::PasswordMismatch` if the
    /// passwords differ; the session is left as it was in both cases.
    /// Otherwise see [`SessionStore::register`].
    pub fn register(
        &self,
        session: &mut SessionStore,
        form: &RegistrationForm,
    ) -> Result<Identity, PortalError> {
        let result = self.guard(session, Transition::Register).and_then(|()| {
            if form.password.expose_secret() == form.confirm_password.expose_secret() {
                session.register(&form.email, &form.password, self.role)
            } else {
                Err(PortalError::PasswordMismatch)
            }
        });
        self.report(
            result,
            Notification::new("Registration Successful", "Please complete your profile."),
        )
    }

    /// Submit the applicant's profile and queue it for admin review.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::InvalidTransition` unless the portal is in
    /// [`PortalState::AwaitingProfile`]; otherwise see
    /// [`SessionStore::update_profile`]. The queue is left unchanged on error.
    #[instrument(skip(self, session, queue, profile), fields(portal = %self.role))]
    pub fn submit_profile(
        &self,
        session: &mut SessionStore,
        queue: &RequestQueue,
        profile: Profile,
    ) -> Result<PendingRequest, PortalError> {
        let result = self.try_submit_profile(session, queue, profile);
        self.report(
            result,
            Notification::new(
                "Profile Submitted",
                "Your profile has been sent for admin approval.",
            ),
        )
    }

    fn try_submit_profile(
        &self,
        session: &mut SessionStore,
        queue: &RequestQueue,
        profile: Profile,
    ) -> Result<PendingRequest, PortalError> {
        let state = self.state(session);
        if !state.allows(self.role, Transition::SubmitProfile) {
            return Err(if session.current().is_none() {
                PortalError::NoActiveSession
            } else {
                PortalError::InvalidTransition {
                    state,
                    transition: Transition::SubmitProfile,
                }
            });
        }

        let identity = session.current().ok_or(PortalError::NoActiveSession)?;
        if profile.role() != identity.role {
            return Err(PortalError::ProfileRoleMismatch {
                identity: identity.role,
                profile: profile.role(),
            });
        }

        let request = queue.submit(identity.id, &identity.email, profile.clone(), Utc::now())?;
        if let Err(e) = session.update_profile(profile) {
            if let Err(undo) = queue.withdraw(request.kind, request.id) {
                warn!(error = %undo, request_id = %request.id, "Failed to withdraw request");
            }
            return Err(e);
        }

        info!(request_id = %request.id, kind = %request.kind, "Profile queued for review");
        Ok(request)
    }

    /// Log out and return where to navigate next.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::logout`].
    pub fn logout(&self, session: &mut SessionStore) -> Result<Route, PortalError> {
        let result = session.logout().map(|()| Route::Home);
        if let Err(e) = &result {
            self.notifier.notify(&e.notification_for(self.role));
        }
        result
    }

    fn guard(&self, session: &SessionStore, transition: Transition) -> Result<(), PortalError> {
        let state = self.state(session);
        if state.allows(self.role, transition) {
            Ok(())
        } else {
            Err(PortalError::InvalidTransition { state, transition })
        }
    }

    fn report<T>(
        &self,
        result: Result<T, PortalError>,
        success: Notification,
    ) -> Result<T, PortalError> {
        match &result {
            Ok(_) => self.notifier.notify(&success),
            Err(e) => self.notifier.notify(&e.notification_for(self.role)),
        }
        result
    }
}
