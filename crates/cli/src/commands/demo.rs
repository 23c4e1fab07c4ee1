//! In-memory walkthrough of an NGO going from registration to approval.

use std::io::Write;
use std::sync::Arc;

use secrecy::SecretString;

use foodwaste_core::{ADMIN_EMAIL, ADMIN_PASSWORD, NgoProfileForm, RequestKind, Role};
use foodwaste_portal::models::RegistrationForm;
use foodwaste_portal::services::{NotificationVariant, RecordingNotifier, SessionStore};
use foodwaste_portal::store::{MemoryAccountStore, MemoryKeyValueStore};
use foodwaste_portal::{AppState, PortalConfig, PortalError};

use super::CommandError;

const APPLICANT_EMAIL: &str = "a@x.org";
const APPLICANT_PASSWORD: &str = "demo-password";

/// Run the walkthrough, printing each step and the notifications it raised.
///
/// # Errors
///
/// Returns `CommandError::Portal` if any step is refused.
pub fn run(out: &mut impl Write) -> Result<(), CommandError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(
        PortalConfig::default(),
        Arc::new(MemoryAccountStore::new()),
        notifier.clone(),
    )?;
    let ngo = state.portal(Role::Ngo);
    let admin = state.portal(Role::Admin);

    let mut applicant = state.open_session(Arc::new(MemoryKeyValueStore::new()));
    let mut reviewer = state.open_session(Arc::new(MemoryKeyValueStore::new()));

    writeln!(out, "== Register {APPLICANT_EMAIL} on the NGO portal")?;
    ngo.register(
        &mut applicant,
        &RegistrationForm::new(APPLICANT_EMAIL, APPLICANT_PASSWORD, APPLICANT_PASSWORD),
    )?;
    report(out, &notifier, &state, &applicant, Role::Ngo)?;

    writeln!(out, "== Submit the NGO profile")?;
    let form = NgoProfileForm {
        foundation_name: "Harvest Share".into(),
        area: "Riverside".into(),
        chairperson_name: "Alex Morgan".into(),
        contact_number: "+15550100".into(),
        address: "12 Mill Road".into(),
        capacity: "500".into(),
        certificate: "harvest-share.pdf".into(),
        ..NgoProfileForm::default()
    };
    let profile = form.validate().map_err(PortalError::from)?;
    let request = ngo.submit_profile(&mut applicant, state.queue(), profile.into())?;
    report(out, &notifier, &state, &applicant, Role::Ngo)?;

    writeln!(out, "== Admin logs in")?;
    let admin_identity = admin.login(
        &mut reviewer,
        ADMIN_EMAIL,
        &SecretString::from(ADMIN_PASSWORD),
    )?;
    report(out, &notifier, &state, &reviewer, Role::Admin)?;
    let pending = state.queue().list_pending(RequestKind::Ngo)?;
    writeln!(out, "   pending NGO requests: {}", pending.len())?;

    writeln!(out, "== Admin approves request #{}", request.id)?;
    state
        .queue()
        .approve(&admin_identity, request.kind, request.id)?;
    report(out, &notifier, &state, &reviewer, Role::Admin)?;

    writeln!(out, "== Applicant refreshes")?;
    applicant.refresh()?;
    report(out, &notifier, &state, &applicant, Role::Ngo)?;

    writeln!(out, "== Applicant logs out")?;
    let next = ngo.logout(&mut applicant)?;
    writeln!(out, "   next: {next}")?;
    report(out, &notifier, &state, &applicant, Role::Ngo)?;
    Ok(())
}

fn report(
    out: &mut impl Write,
    notifier: &RecordingNotifier,
    state: &AppState,
    session: &SessionStore,
    portal: Role,
) -> Result<(), CommandError> {
    for notification in notifier.take() {
        let marker = match notification.variant {
            NotificationVariant::Default => '*',
            NotificationVariant::Destructive => '!',
        };
        writeln!(
            out,
            "   {marker} {}: {}",
            notification.title, notification.description
        )?;
    }
    writeln!(
        out,
        "   {} portal: {}",
        portal.label(),
        state.portal(portal).state(session)
    )?;
    Ok(())
}
