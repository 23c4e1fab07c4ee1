//! Session store.
//!
//! A [`SessionStore`] is the context of one logical client: it holds zero or
//! one active [`Identity`] and mirrors it into a persistence slot after every
//! change, so the session survives a restart. Applicant identities are also
//! backed by the shared account directory, which is where admin approval
//! decisions land.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use foodwaste_core::{Email, Profile, Role};

use crate::error::PortalError;
use crate::models::{Identity, keys};
use crate::services::auth;
use crate::store::{AccountRecord, AccountStore, KeyValueStore, RepositoryError};

/// Holds the active identity of one client.
pub struct SessionStore {
    slot: Arc<dyn KeyValueStore>,
    accounts: Arc<dyn AccountStore>,
    current: Option<Identity>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open a session context, restoring any identity left in the slot.
    ///
    /// Unreadable, malformed or inconsistent slot contents are treated as
    /// "no session" and logged; opening never fails.
    #[must_use]
    pub fn open(slot: Arc<dyn KeyValueStore>, accounts: Arc<dyn AccountStore>) -> Self {
        let current = restore(slot.as_ref());
        Self {
            slot,
            accounts,
            current,
        }
    }

    /// The active identity, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Log in as `role`.
    ///
    /// Admins must present the built-in credential pair and get a fresh
    /// identity. Applicants are looked up in the account directory and their
    /// password is verified against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::InvalidEmail` if the email is malformed,
    /// `PortalError::InvalidCredentials` if the account is unknown or the
    /// password is wrong, or `PortalError::Repository` if storage fails.
    /// The active session is unchanged on error.
    #[instrument(skip(self, password))]
    pub fn login(
        &mut self,
        email: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<Identity, PortalError> {
        let email = Email::parse(email)?;

        let identity = if role == Role::Admin {
            if !auth::is_admin_credential(&email, password) {
                warn!("Rejected admin login");
                return Err(PortalError::InvalidCredentials);
            }
            Identity::admin(email)
        } else {
            let record = self
                .accounts
                .find(role, &email)?
                .ok_or(PortalError::InvalidCredentials)?;
            auth::verify_password(password, &record.password_hash)?;
            record.identity
        };

        self.activate(identity.clone())?;
        info!(identity_id = %identity.id, approved = identity.is_approved, "Logged in");
        Ok(identity)
    }

    /// Register a new applicant and make it the active identity.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::InvalidRole` for `Role::Admin`,
    /// `PortalError::InvalidEmail` if the email is malformed,
    /// `PortalError::AccountExists` if the role/email pair is taken, or
    /// `PortalError::Repository` if storage fails. Nothing is stored on error.
    #[instrument(skip(self, password))]
    pub fn register(
        &mut self,
        email: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<Identity, PortalError> {
        if !role.is_applicant() {
            return Err(PortalError::InvalidRole(role.to_string()));
        }
        let email = Email::parse(email)?;
        let password_hash = auth::hash_password(password)?;

        let identity = Identity::applicant(email, role);
        self.accounts
            .insert(AccountRecord {
                identity: identity.clone(),
                password_hash,
            })
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => PortalError::AccountExists,
                other => PortalError::Repository(other),
            })?;

        if let Err(e) = self.activate(identity.clone()) {
            if let Err(undo) = self.accounts.remove(identity.id) {
                warn!(error = %undo, identity_id = %identity.id, "Failed to undo registration");
            }
            return Err(e);
        }

        info!(identity_id = %identity.id, "Registered applicant");
        Ok(identity)
    }

    /// Clear the active identity and its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if the slot cannot be cleared; the
    /// identity stays active in that case.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), PortalError> {
        self.slot.remove(keys::CURRENT_USER)?;
        if let Some(identity) = self.current.take() {
            info!(identity_id = %identity.id, "Logged out");
        }
        Ok(())
    }

    /// Store `profile` on the active identity.
    ///
    /// Applying the same profile twice leaves the same stored identity.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::NoActiveSession` with no active identity,
    /// `PortalError::ProfileRoleMismatch` if the profile is for another role,
    /// or `PortalError::Repository` if storage fails. Nothing changes on error.
    #[instrument(skip(self, profile))]
    pub fn update_profile(&mut self, profile: Profile) -> Result<Identity, PortalError> {
        let current = self.current.as_ref().ok_or(PortalError::NoActiveSession)?;

        if profile.role() != current.role {
            return Err(PortalError::ProfileRoleMismatch {
                identity: current.role,
                profile: profile.role(),
            });
        }

        let previous = current.profile.clone();
        let id = current.id;
        let updated = self.accounts.set_profile(id, Some(profile))?;

        if let Err(e) = self.activate(updated.clone()) {
            if let Err(undo) = self.accounts.set_profile(id, previous) {
                warn!(error = %undo, identity_id = %id, "Failed to undo profile update");
            }
            return Err(e);
        }

        info!(identity_id = %id, "Profile stored");
        Ok(updated)
    }

    /// Reload the active applicant from the account directory.
    ///
    /// This is how an approval made in the admin's session reaches the
    /// applicant's session. Admin sessions and empty sessions are left as is.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if storage fails.
    #[instrument(skip(self))]
    pub fn refresh(&mut self) -> Result<Option<&Identity>, PortalError> {
        let Some(current) = self.current.as_ref() else {
            return Ok(None);
        };
        if current.role == Role::Admin {
            return Ok(self.current.as_ref());
        }

        match self.accounts.get(current.id)? {
            Some(latest) if latest != *current => {
                debug!(identity_id = %latest.id, approved = latest.is_approved, "Session refreshed");
                self.activate(latest)?;
            }
            Some(_) => {}
            None => {
                warn!(identity_id = %current.id, "Account no longer exists, ending session");
                self.logout()?;
            }
        }
        Ok(self.current.as_ref())
    }

    /// Persist `identity` to the slot, then make it active.
    fn activate(&mut self, identity: Identity) -> Result<(), PortalError> {
        let json = serde_json::to_string(&identity).map_err(RepositoryError::from)?;
        self.slot.set(keys::CURRENT_USER, &json)?;
        self.current = Some(identity);
        Ok(())
    }
}

/// Read the identity left in the slot by a previous process.
fn restore(slot: &dyn KeyValueStore) -> Option<Identity> {
    let raw = match slot.get(keys::CURRENT_USER) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Could not read session slot, starting without a session");
            return None;
        }
    };

    match serde_json::from_str::<Identity>(&raw) {
        Ok(identity) if identity.is_consistent() => {
            debug!(identity_id = %identity.id, role = %identity.role, "Session restored");
            Some(identity)
        }
        Ok(identity) => {
            warn!(identity_id = %identity.id, "Ignoring inconsistent session data");
            None
        }
        Err(e) => {
            warn!(error = %e, "Ignoring malformed session data");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foodwaste_core::{ADMIN_EMAIL, ADMIN_PASSWORD, NgoProfileForm, RestaurantProfileForm};

    use super::*;
    use crate::store::{MemoryAccountStore, MemoryKeyValueStore};

    struct Fixture {
        slot: Arc<MemoryKeyValueStore>,
        accounts: Arc<MemoryAccountStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                slot: Arc::new(MemoryKeyValueStore::new()),
                accounts: Arc::new(MemoryAccountStore::new()),
            }
        }

        fn open(&self) -> SessionStore {
            SessionStore::open(self.slot.clone(), self.accounts.clone())
        }

        fn slot_contents(&self) -> Option<String> {
            self.slot.get(keys::CURRENT_USER).unwrap()
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    fn ngo_profile(capacity: &str) -> Profile {
        NgoProfileForm {
            foundation_name: "Hope Foundation".into(),
            area: "Downtown".into(),
            chairperson_name: "John Smith".into(),
            contact_number: "+1234567890".into(),
            address: "12 Relief Road".into(),
            capacity: capacity.into(),
            certificate: "certificate1.pdf".into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into()
    }

    #[test]
    fn test_register_applicants_start_unapproved() {
        for role in [Role::Ngo, Role::Restaurant] {
            let fixture = Fixture::new();
            let mut session = fixture.open();
            let identity = session.register("a@x.org", &secret("p1"), role).unwrap();

            assert_eq!(identity.role, role);
            assert!(!identity.is_approved);
            assert!(identity.profile.is_none());
            assert_eq!(session.current(), Some(&identity));
            assert!(fixture.slot_contents().is_some());
        }
    }

    #[test]
    fn test_register_admin_is_invalid_role() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let err = session
            .register(ADMIN_EMAIL, &secret(ADMIN_PASSWORD), Role::Admin)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidRole(ref r) if r == "admin"));
        assert!(session.current().is_none());
        assert!(fixture.accounts.is_empty().unwrap());
    }

    #[test]
    fn test_register_twice_conflicts() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        session.register("a@x.org", &secret("p1"), Role::Ngo).unwrap();
        let first = session.current().cloned();

        let err = session
            .register("a@x.org", &secret("p2"), Role::Ngo)
            .unwrap_err();
        assert!(matches!(err, PortalError::AccountExists));
        assert_eq!(session.current().cloned(), first);
    }

    #[test]
    fn test_admin_login() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let identity = session
            .login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD), Role::Admin)
            .unwrap();
        assert!(identity.is_approved);
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_admin_login_with_wrong_password() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let err = session
            .login(ADMIN_EMAIL, &secret("admin321"), Role::Admin)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));
        assert!(session.current().is_none());
        assert!(fixture.slot_contents().is_none());
    }

    #[test]
    fn test_applicant_login_verifies_password() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let registered = session
            .register("green@restaurant.com", &secret("kitchen"), Role::Restaurant)
            .unwrap();
        session.logout().unwrap();

        let err = session
            .login("green@restaurant.com", &secret("wrong"), Role::Restaurant)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));
        assert!(session.current().is_none());

        let err = session
            .login("green@restaurant.com", &secret("kitchen"), Role::Ngo)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidCredentials));

        let identity = session
            .login("green@restaurant.com", &secret("kitchen"), Role::Restaurant)
            .unwrap();
        assert_eq!(identity.id, registered.id);
    }

    #[test]
    fn test_update_profile_without_session() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let err = session.update_profile(ngo_profile("500")).unwrap_err();
        assert!(matches!(err, PortalError::NoActiveSession));
    }

    #[test]
    fn test_update_profile_is_idempotent() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        session.register("a@x.org", &secret("p1"), Role::Ngo).unwrap();

        let first = session.update_profile(ngo_profile("500")).unwrap();
        let slot_after_first = fixture.slot_contents();
        let second = session.update_profile(ngo_profile("500")).unwrap();

        assert_eq!(first, second);
        assert_eq!(fixture.slot_contents(), slot_after_first);
        assert_eq!(session.current(), Some(&second));
    }

    #[test]
    fn test_update_profile_rejects_other_role() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        session
            .register("green@restaurant.com", &secret("p1"), Role::Restaurant)
            .unwrap();

        let err = session.update_profile(ngo_profile("500")).unwrap_err();
        assert!(matches!(
            err,
            PortalError::ProfileRoleMismatch {
                identity: Role::Restaurant,
                profile: Role::Ngo
            }
        ));
        assert!(session.current().unwrap().profile.is_none());

        let restaurant = RestaurantProfileForm {
            restaurant_name: "The Green Kitchen".into(),
            owner_name: "Mike Johnson".into(),
            contact_number: "+1122334455".into(),
            location: "Main Street".into(),
            instagram_link: String::new(),
        }
        .validate()
        .unwrap();
        session.update_profile(restaurant.into()).unwrap();
        assert!(session.current().unwrap().has_profile());
    }

    #[test]
    fn test_session_restores_from_slot() {
        let fixture = Fixture::new();
        let registered = fixture
            .open()
            .register("a@x.org", &secret("p1"), Role::Ngo)
            .unwrap();

        let reopened = fixture.open();
        assert_eq!(reopened.current(), Some(&registered));
    }

    #[test]
    fn test_logout_then_restore_is_empty() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        session
            .login(ADMIN_EMAIL, &secret(ADMIN_PASSWORD), Role::Admin)
            .unwrap();
        session.logout().unwrap();

        assert!(session.current().is_none());
        assert!(fixture.slot_contents().is_none());
        assert!(fixture.open().current().is_none());
    }

    #[test]
    fn test_malformed_slot_is_no_session() {
        let fixture = Fixture::new();
        for raw in ["not json", r#"{"email":"a@x.org"}"#, r#"{"id":"x","role":"ngo"}"#] {
            fixture.slot.set(keys::CURRENT_USER, raw).unwrap();
            assert!(fixture.open().current().is_none(), "{raw}");
        }
    }

    #[test]
    fn test_unapproved_admin_in_slot_is_no_session() {
        let fixture = Fixture::new();
        let mut admin = Identity::admin(Email::parse(ADMIN_EMAIL).unwrap());
        admin.is_approved = false;
        fixture
            .slot
            .set(keys::CURRENT_USER, &serde_json::to_string(&admin).unwrap())
            .unwrap();
        assert!(fixture.open().current().is_none());
    }

    #[test]
    fn test_refresh_picks_up_approval() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let identity = session.register("a@x.org", &secret("p1"), Role::Ngo).unwrap();

        fixture.accounts.set_approved(identity.id, true).unwrap();
        assert!(!session.current().unwrap().is_approved);

        let refreshed = session.refresh().unwrap().cloned().unwrap();
        assert!(refreshed.is_approved);
        assert!(fixture.open().current().unwrap().is_approved);
    }

    #[test]
    fn test_refresh_ends_session_for_deleted_account() {
        let fixture = Fixture::new();
        let mut session = fixture.open();
        let identity = session.register("a@x.org", &secret("p1"), Role::Ngo).unwrap();
        fixture.accounts.remove(identity.id).unwrap();

        assert!(session.refresh().unwrap().is_none());
        assert!(fixture.slot_contents().is_none());
    }
}
