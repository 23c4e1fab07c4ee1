//! Roles and status enums.
//!
//! A [`Role`] is fixed when an identity is created. Only NGOs and restaurants
//! apply for approval, which is what [`RequestKind`] captures; admins review.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a role or request kind string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// The kind of actor an identity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A food-receiving NGO.
    Ngo,
    /// A restaurant donating surplus food.
    Restaurant,
    /// The marketplace administrator.
    Admin,
}

impl Role {
    /// Every role, in portal order.
    pub const ALL: [Self; 3] = [Self::Ngo, Self::Restaurant, Self::Admin];

    /// Lowercase name used on the wire and in persisted sessions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ngo => "ngo",
            Self::Restaurant => "restaurant",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label used in notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ngo => "NGO",
            Self::Restaurant => "Restaurant",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role goes through registration and admin approval.
    #[must_use]
    pub const fn is_applicant(self) -> bool {
        !matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ngo" => Ok(Self::Ngo),
            "restaurant" => Ok(Self::Restaurant),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

/// The kind of application in the admin review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Ngo,
    Restaurant,
}

impl RequestKind {
    /// The applicant role behind this kind of request.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Ngo => Role::Ngo,
            Self::Restaurant => Role::Restaurant,
        }
    }
}

impl TryFrom<Role> for RequestKind {
    type Error = RoleError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Ngo => Ok(Self::Ngo),
            Role::Restaurant => Ok(Self::Restaurant),
            Role::Admin => Err(RoleError(role.to_string())),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role().as_str())
    }
}

impl FromStr for RequestKind {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Role>()?.try_into()
    }
}

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Whether an admin has already decided on the request.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("ngo".parse::<Role>().unwrap(), Role::Ngo);
        assert_eq!(" Restaurant ".parse::<Role>().unwrap(), Role::Restaurant);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "donor".parse::<Role>(),
            Err(RoleError("donor".to_owned()))
        );
    }

    #[test]
    fn test_role_serde_matches_display() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn test_only_admin_is_not_an_applicant() {
        assert!(Role::Ngo.is_applicant());
        assert!(Role::Restaurant.is_applicant());
        assert!(!Role::Admin.is_applicant());
    }

    #[test]
    fn test_request_kind_from_role() {
        assert_eq!(RequestKind::try_from(Role::Ngo).unwrap(), RequestKind::Ngo);
        assert_eq!(
            RequestKind::try_from(Role::Restaurant).unwrap().role(),
            Role::Restaurant
        );
        assert!(RequestKind::try_from(Role::Admin).is_err());
        assert!("admin".parse::<RequestKind>().is_err());
    }

    #[test]
    fn test_request_status_resolution() {
        assert!(!RequestStatus::default().is_resolved());
        assert!(RequestStatus::Approved.is_resolved());
        assert!(RequestStatus::Rejected.is_resolved());
    }
}
