//! Credential checks.
//!
//! Applicant passwords are stored as Argon2id hashes in the account
//! directory. The administrator has a single fixed credential pair.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use foodwaste_core::{ADMIN_EMAIL, ADMIN_PASSWORD, Email};

use crate::error::PortalError;

/// Whether the pair matches the built-in administrator account exactly.
#[must_use]
pub fn is_admin_credential(email: &Email, password: &SecretString) -> bool {
    email.as_str() == ADMIN_EMAIL && password.expose_secret() == ADMIN_PASSWORD
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `PortalError::PasswordHash` if hashing fails.
pub fn hash_password(password: &SecretString) -> Result<String, PortalError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PortalError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `PortalError::InvalidCredentials` if the password does not match
/// or the stored hash cannot be parsed.
pub fn verify_password(password: &SecretString, hash: &str) -> Result<(), PortalError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PortalError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
        .map_err(|_| PortalError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_credential_is_exact() {
        let admin = Email::parse(ADMIN_EMAIL).unwrap();
        assert!(is_admin_credential(&admin, &SecretString::from("admin123")));
        assert!(!is_admin_credential(&admin, &SecretString::from("admin1234")));
        assert!(!is_admin_credential(&admin, &SecretString::from("Admin123")));

        let other = Email::parse("root@foodwaste.com").unwrap();
        assert!(!is_admin_credential(&other, &SecretString::from("admin123")));
    }

    #[test]
    fn test_hash_then_verify() {
        let password = SecretString::from("p1-long-enough");
        let hash = hash_password(&password).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&password, &hash).is_ok());
        assert!(matches!(
            verify_password(&SecretString::from("p2"), &hash),
            Err(PortalError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_each_hash_gets_a_fresh_salt() {
        let password = SecretString::from("p1-long-enough");
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&password, &second).is_ok());
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password(&SecretString::from("p1"), "not-a-phc-string"),
            Err(PortalError::InvalidCredentials)
        ));
    }
}
