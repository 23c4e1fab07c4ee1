//! Admin review queue.
//!
//! Holds every NGO and restaurant application submitted for review. Rows are
//! never deleted once resolved: they keep their final status and reviewer and
//! simply drop out of [`RequestQueue::list_pending`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument, warn};

use foodwaste_core::{
    Email, IdentityId, NgoProfile, Profile, RequestId, RequestKind, RequestStatus,
    RestaurantProfile, Role,
};

use crate::error::PortalError;
use crate::models::{Identity, PendingRequest};
use crate::services::notify::{Notification, Notifier};
use crate::store::{AccountStore, RepositoryError};

#[derive(Debug, Default)]
struct Queue {
    requests: Vec<PendingRequest>,
    next_ids: HashMap<RequestKind, RequestId>,
}

impl Queue {
    fn allocate_id(&mut self, kind: RequestKind) -> RequestId {
        let slot = self.next_ids.entry(kind).or_insert(RequestId::new(1));
        let id = *slot;
        *slot = id.next();
        id
    }

    fn find(&self, kind: RequestKind, id: RequestId) -> Option<&PendingRequest> {
        self.requests
            .iter()
            .find(|request| request.kind == kind && request.id == id)
    }

    fn find_mut(&mut self, kind: RequestKind, id: RequestId) -> Option<&mut PendingRequest> {
        self.requests
            .iter_mut()
            .find(|request| request.kind == kind && request.id == id)
    }
}

/// Pending applications, grouped by kind, with the admin decisions on them.
pub struct RequestQueue {
    accounts: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    inner: RwLock<Queue>,
}

impl fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestQueue")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl RequestQueue {
    /// Create an empty queue that writes approvals into `accounts`.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            accounts,
            notifier,
            inner: RwLock::default(),
        }
    }

    /// Seed the four demo applications shown on a fresh admin portal.
    ///
    /// Demo rows are not linked to any account, so approving one only
    /// changes its status.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if the queue lock is poisoned.
    pub fn with_demo_requests(self) -> Result<Self, PortalError> {
        for (email, profile, submitted_at) in demo_requests()? {
            self.enqueue(None, email, profile, submitted_at)?;
        }
        Ok(self)
    }

    /// Pending rows of `kind`, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if the queue lock is poisoned.
    pub fn list_pending(&self, kind: RequestKind) -> Result<Vec<PendingRequest>, PortalError> {
        let queue = self.inner.read().map_err(RepositoryError::from)?;
        Ok(queue
            .requests
            .iter()
            .filter(|request| request.kind == kind && request.is_pending())
            .cloned()
            .collect())
    }

    /// Look up a row of any status.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if the queue lock is poisoned.
    pub fn get(
        &self,
        kind: RequestKind,
        id: RequestId,
    ) -> Result<Option<PendingRequest>, PortalError> {
        let queue = self.inner.read().map_err(RepositoryError::from)?;
        Ok(queue.find(kind, id).cloned())
    }

    /// Queue an applicant's profile for review.
    ///
    /// The request kind follows the profile.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Repository` if the queue lock is poisoned.
    pub fn submit(
        &self,
        identity_id: IdentityId,
        email: &Email,
        profile: Profile,
        submitted_at: DateTime<Utc>,
    ) -> Result<PendingRequest, PortalError> {
        self.enqueue(Some(identity_id), email.clone(), profile, submitted_at)
    }

    /// Drop a still-pending row. Used to undo a submission that could not
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::RequestNotFound` if no such row exists, or
    /// `PortalError::AlreadyResolved` if it has been reviewed.
    pub fn withdraw(&self, kind: RequestKind, id: RequestId) -> Result<(), PortalError> {
        let mut queue = self.inner.write().map_err(RepositoryError::from)?;
        let request = queue
            .find(kind, id)
            .ok_or(PortalError::RequestNotFound { kind, id })?;
        if request.status.is_resolved() {
            return Err(PortalError::AlreadyResolved { kind, id });
        }
        queue
            .requests
            .retain(|request| request.kind != kind || request.id != id);
        Ok(())
    }

    /// Approve a pending application.
    ///
    /// A linked applicant is marked approved in the account directory before
    /// the row is resolved, so a failed write leaves the row pending. If the
    /// applicant's account no longer exists the row is closed as rejected.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Forbidden` unless `reviewer` is an approved
    /// admin, `PortalError::RequestNotFound` for an unknown id,
    /// `PortalError::AlreadyResolved` if the row was already reviewed,
    /// `PortalError::ApplicantMissing` if the linked account is gone, or
    /// `PortalError::Repository` if storage fails.
    #[instrument(skip(self, reviewer), fields(reviewer = %reviewer.email))]
    pub fn approve(
        &self,
        reviewer: &Identity,
        kind: RequestKind,
        id: RequestId,
    ) -> Result<PendingRequest, PortalError> {
        let result = self.resolve(reviewer, kind, id, RequestStatus::Approved);
        let success = Notification::new(
            "Request Approved",
            format!("{} has been approved successfully.", kind.role().label()),
        );
        self.report(result, success)
    }

    /// Reject a pending application. The applicant stays unapproved.
    ///
    /// # Errors
    ///
    /// Same as [`RequestQueue::approve`].
    #[instrument(skip(self, reviewer), fields(reviewer = %reviewer.email))]
    pub fn reject(
        &self,
        reviewer: &Identity,
        kind: RequestKind,
        id: RequestId,
    ) -> Result<PendingRequest, PortalError> {
        let result = self.resolve(reviewer, kind, id, RequestStatus::Rejected);
        let rejected = Notification::destructive(
            "Request Rejected",
            format!("{} request has been rejected.", kind.role().label()),
        );
        self.report(result, rejected)
    }

    fn resolve(
        &self,
        reviewer: &Identity,
        kind: RequestKind,
        id: RequestId,
        mut status: RequestStatus,
    ) -> Result<PendingRequest, PortalError> {
        if reviewer.role != Role::Admin || !reviewer.is_approved {
            return Err(PortalError::Forbidden(format!(
                "{} cannot review applications",
                reviewer.role
            )));
        }

        let mut queue = self.inner.write().map_err(RepositoryError::from)?;
        let request = queue
            .find_mut(kind, id)
            .ok_or(PortalError::RequestNotFound { kind, id })?;
        if request.status.is_resolved() {
            return Err(PortalError::AlreadyResolved { kind, id });
        }

        let mut applicant_missing = false;
        if status == RequestStatus::Approved {
            if let Some(identity_id) = request.identity_id {
                match self.accounts.set_approved(identity_id, true) {
                    Ok(_) => {}
                    Err(RepositoryError::NotFound) => {
                        warn!(
                            request_id = %id,
                            kind = %kind,
                            %identity_id,
                            "Applicant account is gone, closing request"
                        );
                        status = RequestStatus::Rejected;
                        applicant_missing = true;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        request.status = status;
        request.reviewed_by = Some(reviewer.email.clone());
        request.reviewed_at = Some(Utc::now());

        info!(
            request_id = %id,
            kind = %kind,
            status = %status,
            identity_id = ?request.identity_id,
            "Request resolved"
        );
        if applicant_missing {
            return Err(PortalError::ApplicantMissing { kind, id });
        }
        Ok(request.clone())
    }

    fn enqueue(
        &self,
        identity_id: Option<IdentityId>,
        email: Email,
        profile: Profile,
        submitted_at: DateTime<Utc>,
    ) -> Result<PendingRequest, PortalError> {
        let kind = RequestKind::try_from(profile.role())?;
        let mut queue = self.inner.write().map_err(RepositoryError::from)?;
        let request = PendingRequest {
            id: queue.allocate_id(kind),
            kind,
            identity_id,
            email,
            profile,
            submitted_at,
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
        };
        queue.requests.push(request.clone());
        Ok(request)
    }

    fn report(
        &self,
        result: Result<PendingRequest, PortalError>,
        success: Notification,
    ) -> Result<PendingRequest, PortalError> {
        match &result {
            Ok(_) => self.notifier.notify(&success),
            Err(e) => self.notifier.notify(&e.notification()),
        }
        result
    }
}

fn demo_date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, PortalError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid demo date {year}-{month}-{day}"))
                .into()
        })
}

fn demo_ngo(
    foundation_name: &str,
    area: &str,
    chairperson_name: &str,
    contact_number: &str,
    capacity: u32,
    certificate: &str,
) -> Profile {
    Profile::Ngo(NgoProfile {
        foundation_name: foundation_name.into(),
        area: area.into(),
        chairperson_name: chairperson_name.into(),
        contact_number: contact_number.into(),
        address: area.into(),
        capacity,
        certificate: certificate.into(),
        instagram_link: None,
        youtube_link: None,
    })
}

fn demo_restaurant(
    restaurant_name: &str,
    owner_name: &str,
    contact_number: &str,
    location: &str,
) -> Profile {
    Profile::Restaurant(RestaurantProfile {
        restaurant_name: restaurant_name.into(),
        owner_name: owner_name.into(),
        contact_number: contact_number.into(),
        location: location.into(),
        instagram_link: None,
    })
}

fn demo_requests() -> Result<Vec<(Email, Profile, DateTime<Utc>)>, PortalError> {
    Ok(vec![
        (
            Email::parse("hope@ngo.org")?,
            demo_ngo(
                "Hope Foundation",
                "Downtown",
                "John Smith",
                "+1234567890",
                500,
                "certificate1.pdf",
            ),
            demo_date(2024, 1, 15)?,
        ),
        (
            Email::parse("care@ngo.org")?,
            demo_ngo(
                "Community Care",
                "Westside",
                "Jane Doe",
                "+0987654321",
                300,
                "certificate2.pdf",
            ),
            demo_date(2024, 1, 16)?,
        ),
        (
            Email::parse("green@restaurant.com")?,
            demo_restaurant("The Green Kitchen", "Mike Johnson", "+1122334455", "Main Street"),
            demo_date(2024, 1, 14)?,
        ),
        (
            Email::parse("sunset@restaurant.com")?,
            demo_restaurant("Sunset Bistro", "Sarah Williams", "+5544332211", "Park Avenue"),
            demo_date(2024, 1, 15)?,
        ),
    ])
}
