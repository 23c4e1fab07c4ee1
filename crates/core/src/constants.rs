//! Fixed values shared across the portals.
//!
//! These are constants, not configuration: none of them can be overridden
//! from the environment.

/// Email of the single built-in administrator account.
pub const ADMIN_EMAIL: &str = "admin@foodwaste.com";

/// Password of the single built-in administrator account.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Name of the persistence slot that holds the active identity.
pub const SESSION_KEY: &str = "user";
