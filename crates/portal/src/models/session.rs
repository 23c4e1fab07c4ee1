//! Session-related types.

use secrecy::SecretString;

/// Keys used in the persistence slot.
pub mod keys {
    /// Key for storing the active identity.
    pub const CURRENT_USER: &str = foodwaste_core::SESSION_KEY;
}

/// Registration form input, before any validation.
///
/// Passwords stay wrapped so they never reach logs; `Debug` prints them as
/// redacted.
#[derive(Debug)]
pub struct RegistrationForm {
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
            confirm_password: SecretString::from(confirm_password.into()),
        }
    }
}
