//! Review queue listing.

use std::io::Write;

use foodwaste_core::{Profile, RequestKind};
use foodwaste_portal::AppState;

use super::CommandError;

/// Print the pending applications of `kind`, oldest first.
///
/// # Errors
///
/// Returns `CommandError::Portal` if the queue cannot be read.
pub fn list(state: &AppState, kind: RequestKind, out: &mut impl Write) -> Result<(), CommandError> {
    let pending = state.queue().list_pending(kind)?;
    if pending.is_empty() {
        writeln!(out, "No pending {} requests.", kind.role().label())?;
        return Ok(());
    }

    for request in pending {
        let detail = match &request.profile {
            Profile::Ngo(ngo) => format!("{}, capacity {}", ngo.area, ngo.capacity),
            Profile::Restaurant(restaurant) => restaurant.location.clone(),
        };
        writeln!(
            out,
            "#{:<3} {:<20} {:<24} {:<28} {}",
            request.id.to_string(),
            request.profile.display_name(),
            request.email.as_str(),
            detail,
            request.submitted_at.format("%Y-%m-%d"),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use foodwaste_portal::PortalConfig;
    use foodwaste_portal::services::RecordingNotifier;
    use foodwaste_portal::store::MemoryAccountStore;

    use super::*;

    fn state(seed_demo_requests: bool) -> AppState {
        AppState::new(
            PortalConfig {
                seed_demo_requests,
                ..PortalConfig::default()
            },
            Arc::new(MemoryAccountStore::new()),
            Arc::new(RecordingNotifier::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_lists_seeded_ngos() {
        let mut out = Vec::new();
        list(&state(true), RequestKind::Ngo, &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#1"));
        assert!(lines[0].contains("Hope Foundation"));
        assert!(lines[0].contains("Downtown, capacity 500"));
        assert!(lines[0].ends_with("2024-01-15"));
        assert!(lines[1].contains("Community Care"));
    }

    #[test]
    fn test_empty_queue() {
        let mut out = Vec::new();
        list(&state(false), RequestKind::Restaurant, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No pending Restaurant requests.\n"
        );
    }
}
