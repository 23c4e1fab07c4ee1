//! CLI commands. Each writes its report to the given output.

pub mod demo;
pub mod requests;
pub mod session;

use thiserror::Error;

use foodwaste_core::Role;
use foodwaste_portal::PortalError;
use foodwaste_portal::services::Notification;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The portal rejected the action.
    #[error("{title}: {description}")]
    Portal {
        title: String,
        description: String,
        #[source]
        source: PortalError,
    },

    /// Writing the report failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// A failed action on the `portal` page, worded the way that page shows it.
    #[must_use]
    pub fn on_portal(err: PortalError, portal: Role) -> Self {
        let notification = err.notification_for(portal);
        Self::portal(err, notification)
    }

    fn portal(source: PortalError, notification: Notification) -> Self {
        Self::Portal {
            title: notification.title,
            description: notification.description,
            source,
        }
    }
}

impl From<PortalError> for CommandError {
    fn from(err: PortalError) -> Self {
        let notification = err.notification();
        Self::portal(err, notification)
    }
}
