//! Review request domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodwaste_core::{Email, IdentityId, Profile, RequestId, RequestKind, RequestStatus};

/// A submitted application in the admin review queue.
///
/// Holds a snapshot of the profile as it was submitted; later edits to the
/// applicant's identity do not change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    /// Sequential per kind.
    pub id: RequestId,
    pub kind: RequestKind,
    /// Applicant whose approval flag this request controls.
    /// `None` for demo rows that have no live account behind them.
    pub identity_id: Option<IdentityId>,
    pub email: Email,
    pub profile: Profile,
    pub submitted_at: DateTime<Utc>,
    pub status: RequestStatus,
    /// Admin who approved or rejected the request.
    pub reviewed_by: Option<Email>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.status.is_resolved()
    }
}
