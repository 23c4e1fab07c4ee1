//! Session slot commands.

use std::io::Write;

use secrecy::SecretString;

use foodwaste_core::{Role, Route};
use foodwaste_portal::AppState;
use foodwaste_portal::services::SessionStore;

use super::CommandError;

/// Print the state a portal derives for the saved session.
///
/// # Errors
///
/// Returns `CommandError::Io` if the report cannot be written.
pub fn status(
    state: &AppState,
    session: &SessionStore,
    portal: Role,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let portal = state.portal(portal);
    let portal_state = portal.state(session);

    writeln!(out, "portal:    {} ({})", portal.role().label(), portal.route())?;
    match session.current() {
        Some(identity) => writeln!(
            out,
            "identity:  {} [{}{}]",
            identity.email,
            identity.role,
            if identity.is_approved { ", approved" } else { "" }
        )?,
        None => writeln!(out, "identity:  none")?,
    }
    writeln!(out, "state:     {portal_state}")?;

    let transitions: Vec<String> = portal_state
        .transitions(portal.role())
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "available: {}", transitions.join(", "))?;
    Ok(())
}

/// Clear the saved session.
///
/// # Errors
///
/// Returns `CommandError::Portal` if the slot cannot be cleared.
pub fn logout(session: &mut SessionStore, out: &mut impl Write) -> Result<(), CommandError> {
    let had_session = session.current().is_some();
    session.logout()?;

    if had_session {
        writeln!(out, "Logged out. Next: {}", Route::Home)?;
    } else {
        writeln!(out, "No active session.")?;
    }
    Ok(())
}

/// Log in with the administrator credentials and save the session.
///
/// # Errors
///
/// Returns `CommandError::Portal` with the "Login Failed" notification if
/// the credentials are wrong, or "Action Unavailable" if the slot already
/// holds an admin session.
pub fn admin_login(
    state: &AppState,
    session: &mut SessionStore,
    email: &str,
    password: String,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let password = SecretString::from(password);
    let portal = state.portal(Role::Admin);
    let identity = portal
        .login(session, email, &password)
        .map_err(|e| CommandError::on_portal(e, Role::Admin))?;

    writeln!(out, "Logged in as {}. Next: {}", identity.email, portal.route())?;
    Ok(())
}
