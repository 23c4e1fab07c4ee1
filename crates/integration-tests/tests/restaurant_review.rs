//! Admin review of restaurant applications.

#![allow(clippy::unwrap_used)]

use foodwaste_core::{RequestId, RequestKind, RequestStatus, RestaurantProfileForm, Role};
use foodwaste_integration_tests::TestContext;
use foodwaste_portal::PortalError;
use foodwaste_portal::services::{NotificationVariant, PortalState};
use foodwaste_portal::store::AccountStore;

fn restaurant_form() -> RestaurantProfileForm {
    RestaurantProfileForm {
        restaurant_name: "The Green Kitchen".into(),
        owner_name: "Mike Johnson".into(),
        contact_number: "+1122334455".into(),
        location: "Main Street".into(),
        instagram_link: "https://instagram.com/greenkitchen".into(),
    }
}

#[test]
fn test_reject_keeps_restaurant_pending_review() {
    let ctx = TestContext::new().unwrap();
    let restaurant = ctx.portal(Role::Restaurant);
    let mut applicant = ctx.client();
    let identity = applicant.register(&restaurant, "b@y.com", "p1").unwrap();

    let request = restaurant
        .submit_profile(
            &mut applicant.session,
            ctx.state.queue(),
            restaurant_form().validate().unwrap().into(),
        )
        .unwrap();
    assert_eq!(request.kind, RequestKind::Restaurant);
    assert_eq!(request.id, RequestId::new(1));

    let (_admin, reviewer) = ctx.admin().unwrap();
    let _ = ctx.notifications();
    let rejected = ctx
        .state
        .queue()
        .reject(&reviewer, RequestKind::Restaurant, request.id)
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.reviewed_by, Some(reviewer.email.clone()));

    let notification = ctx.notifications().pop().unwrap();
    assert_eq!(notification.title, "Request Rejected");
    assert_eq!(
        notification.description,
        "Restaurant request has been rejected."
    );
    assert_eq!(notification.variant, NotificationVariant::Destructive);

    applicant.session.refresh().unwrap();
    assert!(!ctx.accounts.get(identity.id).unwrap().unwrap().is_approved);
    assert_eq!(
        restaurant.state(&applicant.session),
        PortalState::PendingReview
    );
    assert!(
        ctx.state
            .queue()
            .list_pending(RequestKind::Restaurant)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_demo_queue_review() {
    let ctx = TestContext::with_demo_requests().unwrap();
    let (_admin, reviewer) = ctx.admin().unwrap();
    let queue = ctx.state.queue();

    let names = |kind| -> Vec<String> {
        queue
            .list_pending(kind)
            .unwrap()
            .into_iter()
            .map(|request| request.profile.display_name().to_string())
            .collect()
    };
    assert_eq!(names(RequestKind::Restaurant), ["The Green Kitchen", "Sunset Bistro"]);

    queue
        .approve(&reviewer, RequestKind::Restaurant, RequestId::new(1))
        .unwrap();
    assert_eq!(names(RequestKind::Restaurant), ["Sunset Bistro"]);
    assert_eq!(names(RequestKind::Ngo), ["Hope Foundation", "Community Care"]);

    assert!(matches!(
        queue.reject(&reviewer, RequestKind::Restaurant, RequestId::new(1)),
        Err(PortalError::AlreadyResolved { .. })
    ));
}

#[test]
fn test_applicant_cannot_review() {
    let ctx = TestContext::with_demo_requests().unwrap();
    let restaurant = ctx.portal(Role::Restaurant);
    let mut applicant = ctx.client();
    let identity = applicant.register(&restaurant, "b@y.com", "p1").unwrap();

    let err = ctx
        .state
        .queue()
        .approve(&identity, RequestKind::Restaurant, RequestId::new(2))
        .unwrap_err();
    assert!(matches!(err, PortalError::Forbidden(_)));
    assert_eq!(
        ctx.state
            .queue()
            .list_pending(RequestKind::Restaurant)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_restaurant_profile_on_ngo_portal() {
    let ctx = TestContext::new().unwrap();
    let ngo = ctx.portal(Role::Ngo);
    let mut applicant = ctx.client();
    applicant.register(&ngo, "a@x.org", "p1").unwrap();

    let err = ngo
        .submit_profile(
            &mut applicant.session,
            ctx.state.queue(),
            restaurant_form().validate().unwrap().into(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PortalError::ProfileRoleMismatch {
            identity: Role::Ngo,
            profile: Role::Restaurant
        }
    ));
    assert_eq!(ngo.state(&applicant.session), PortalState::AwaitingProfile);
    assert!(
        ctx.state
            .queue()
            .list_pending(RequestKind::Restaurant)
            .unwrap()
            .is_empty()
    );
}
