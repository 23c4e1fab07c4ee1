//! Unified portal error type.
//!
//! Every user action returns `Result<T, PortalError>`. Errors are never fatal:
//! the caller turns them into a destructive [`Notification`] with
//! [`PortalError::notification`] and carries on.

use thiserror::Error;

use foodwaste_core::{EmailError, ProfileError, RequestId, RequestKind, Role, RoleError};

use crate::services::approval::{PortalState, Transition};
use crate::services::notify::Notification;
use crate::store::RepositoryError;

/// Application-level error type for the portals.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Login fields do not match a known account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The two registration password fields differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Registration as admin, or an unrecognized role string.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// A profile update was attempted with no active identity.
    #[error("no active session")]
    NoActiveSession,

    /// The review request has already been approved or rejected.
    #[error("{kind} request {id} has already been resolved")]
    AlreadyResolved {
        /// Kind of the request.
        kind: RequestKind,
        /// Id of the request.
        id: RequestId,
    },

    /// No review request with this id exists.
    #[error("{kind} request {id} not found")]
    RequestNotFound {
        /// Kind of the request.
        kind: RequestKind,
        /// Id of the request.
        id: RequestId,
    },

    /// The applicant linked to an approved request no longer has an account.
    /// The request is closed as rejected.
    #[error("{kind} request {id} has no applicant account")]
    ApplicantMissing {
        /// Kind of the request.
        kind: RequestKind,
        /// Id of the request.
        id: RequestId,
    },

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Profile form failed validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    /// The submitted profile belongs to a different role than the identity.
    #[error("a {profile} profile cannot be stored on a {identity} identity")]
    ProfileRoleMismatch {
        /// Role of the active identity.
        identity: Role,
        /// Role the profile was written for.
        profile: Role,
    },

    /// An account for this role and email is already registered.
    #[error("an account already exists for this email")]
    AccountExists,

    /// The actor is not allowed to perform this action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The transition is not offered in the current portal state.
    #[error("{transition} is not available while {state}")]
    InvalidTransition {
        /// State the portal was in.
        state: PortalState,
        /// Transition that was attempted.
        transition: Transition,
    },

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<RoleError> for PortalError {
    fn from(err: RoleError) -> Self {
        Self::InvalidRole(err.0)
    }
}

impl PortalError {
    /// The notification shown for this error on the `portal` page.
    ///
    /// Identical to [`PortalError::notification`] except for a failed admin
    /// login, which names the admin credentials.
    #[must_use]
    pub fn notification_for(&self, portal: Role) -> Notification {
        match (self, portal) {
            (Self::InvalidCredentials, Role::Admin) => {
                Notification::destructive("Login Failed", "Invalid admin credentials.")
            }
            _ => self.notification(),
        }
    }

    /// The destructive notification shown for this error.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::InvalidCredentials => {
                Notification::destructive("Login Failed", "Please check your credentials.")
            }
            Self::PasswordMismatch => {
                Notification::destructive("Password Mismatch", "Passwords do not match.")
            }
            Self::InvalidRole(role) => {
                Notification::destructive("Invalid Role", format!("\"{role}\" is not a valid role."))
            }
            Self::NoActiveSession => Notification::destructive(
                "Not Logged In",
                "Please log in before submitting your profile.",
            ),
            Self::AlreadyResolved { kind, .. } => Notification::destructive(
                "Already Resolved",
                format!("This {} request has already been reviewed.", kind.role().label()),
            ),
            Self::RequestNotFound { kind, .. } => Notification::destructive(
                "Request Not Found",
                format!("No such {} request.", kind.role().label()),
            ),
            Self::ApplicantMissing { kind, .. } => Notification::destructive(
                "Applicant Not Found",
                format!(
                    "This {} account no longer exists. The request was closed.",
                    kind.role().label()
                ),
            ),
            Self::InvalidEmail(e) => Notification::destructive("Invalid Email", e.to_string()),
            Self::InvalidProfile(e) => Notification::destructive("Invalid Profile", e.to_string()),
            Self::ProfileRoleMismatch { .. } => Notification::destructive(
                "Invalid Profile",
                "This profile does not match your account type.",
            ),
            Self::AccountExists => Notification::destructive(
                "Registration Failed",
                "An account with this email already exists.",
            ),
            Self::Forbidden(_) => {
                Notification::destructive("Access Denied", "Admin credentials are required.")
            }
            Self::InvalidTransition { .. } => {
                Notification::destructive("Action Unavailable", self.to_string())
            }
            Self::PasswordHash | Self::Repository(_) => {
                Notification::destructive("Something Went Wrong", "Please try again.")
            }
        }
    }
}
