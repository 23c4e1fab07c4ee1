//! Core types for the food waste marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod profile;
pub mod route;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use profile::{
    NgoProfile, NgoProfileForm, Profile, ProfileError, RestaurantProfile, RestaurantProfileForm,
};
pub use route::Route;
pub use status::*;
