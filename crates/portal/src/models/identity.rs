//! Identity domain type.
//!
//! The identity is the only record the session slot holds. Its serialized
//! form keeps the field names the browser front end stored under `"user"`.

use serde::{Deserialize, Serialize};

use foodwaste_core::{Email, IdentityId, Profile, Role};

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque token generated at login or registration.
    pub id: IdentityId,
    /// Login credential and display label.
    pub email: Email,
    /// Fixed at creation, never changed afterwards.
    pub role: Role,
    /// Gates access to the role's dashboard. Always true for admins.
    pub is_approved: bool,
    /// Submitted once by applicants; never present for admins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl Identity {
    /// A freshly registered, unapproved applicant without a profile.
    #[must_use]
    pub fn applicant(email: Email, role: Role) -> Self {
        Self {
            id: IdentityId::generate(),
            email,
            role,
            is_approved: false,
            profile: None,
        }
    }

    /// A freshly logged-in administrator.
    #[must_use]
    pub fn admin(email: Email) -> Self {
        Self {
            id: IdentityId::generate(),
            email,
            role: Role::Admin,
            is_approved: true,
            profile: None,
        }
    }

    #[must_use]
    pub const fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Whether the record respects the identity invariants: admins are
    /// approved and carry no profile, and a profile always matches the role.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match (self.role, &self.profile) {
            (Role::Admin, profile) => self.is_approved && profile.is_none(),
            (role, Some(profile)) => profile.role() == role,
            (_, None) => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use foodwaste_core::RestaurantProfile;

    use super::*;

    fn green_kitchen() -> Profile {
        Profile::Restaurant(RestaurantProfile {
            restaurant_name: "The Green Kitchen".into(),
            owner_name: "Mike Johnson".into(),
            contact_number: "+1122334455".into(),
            location: "Main Street".into(),
            instagram_link: None,
        })
    }

    #[test]
    fn test_applicant_starts_unapproved_without_profile() {
        let identity = Identity::applicant(Email::parse("a@x.org").unwrap(), Role::Ngo);
        assert!(!identity.is_approved);
        assert!(!identity.has_profile());
        assert!(identity.is_consistent());
    }

    #[test]
    fn test_admin_is_approved() {
        let identity = Identity::admin(Email::parse("admin@foodwaste.com").unwrap());
        assert!(identity.is_approved);
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.is_consistent());
    }

    #[test]
    fn test_consistency_checks() {
        let mut admin = Identity::admin(Email::parse("admin@foodwaste.com").unwrap());
        admin.is_approved = false;
        assert!(!admin.is_consistent());

        let mut ngo = Identity::applicant(Email::parse("a@x.org").unwrap(), Role::Ngo);
        ngo.profile = Some(green_kitchen());
        assert!(!ngo.is_consistent());

        let mut restaurant =
            Identity::applicant(Email::parse("green@restaurant.com").unwrap(), Role::Restaurant);
        restaurant.profile = Some(green_kitchen());
        assert!(restaurant.is_consistent());
    }

    #[test]
    fn test_serialized_field_names() {
        let identity = Identity::applicant(Email::parse("a@x.org").unwrap(), Role::Ngo);
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["email"], "a@x.org");
        assert_eq!(json["role"], "ngo");
        assert_eq!(json["isApproved"], false);
        assert!(json.get("profile").is_none());
    }
}
