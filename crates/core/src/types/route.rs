//! Navigation destinations.

use core::fmt;

use crate::Role;

/// A named page the front end can navigate to. Routes carry no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page, also the destination after logout.
    Home,
    NgoPortal,
    RestaurantPortal,
    AdminPortal,
}

impl Route {
    /// URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::NgoPortal => "/ngo-portal",
            Self::RestaurantPortal => "/restaurant-portal",
            Self::AdminPortal => "/admin-portal",
        }
    }

    /// The portal page for a role.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Ngo => Self::NgoPortal,
            Role::Restaurant => Self::RestaurantPortal,
            Role::Admin => Self::AdminPortal,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_paths() {
        assert_eq!(Route::for_role(Role::Ngo).path(), "/ngo-portal");
        assert_eq!(Route::for_role(Role::Restaurant).path(), "/restaurant-portal");
        assert_eq!(Route::for_role(Role::Admin).path(), "/admin-portal");
        assert_eq!(Route::Home.to_string(), "/");
    }
}
