//! Domain models for the portals.
//!
//! These types are what the services pass around and what the stores persist.

pub mod identity;
pub mod request;
pub mod session;

pub use identity::Identity;
pub use request::PendingRequest;
pub use session::{RegistrationForm, keys};
