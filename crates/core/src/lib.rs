//! Food Waste Core - Shared domain types.
//!
//! This crate provides the types shared by every part of the marketplace:
//! - `portal` - Session store, approval state machine and admin request queue
//! - `cli` - Command-line front end for the portals
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no storage,
//! no password hashing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and emails, roles, profiles, statuses and routes
//! - [`constants`] - Fixed values shared by every portal

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
