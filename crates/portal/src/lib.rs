//! Food waste marketplace portals.
//!
//! Session handling, the applicant approval state machine and the admin
//! review queue behind the NGO, restaurant and admin portals. The crate has
//! no UI; front ends drive it through [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::{ConfigError, LogFormat, PortalConfig};
pub use error::PortalError;
pub use state::AppState;
