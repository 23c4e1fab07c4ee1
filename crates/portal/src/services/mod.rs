//! Portal services: sessions, the approval state machine and the review queue.

pub mod approval;
pub mod auth;
pub mod notify;
pub mod request_queue;
pub mod session;

pub use approval::{Portal, PortalState, Transition};
pub use notify::{Notification, NotificationVariant, Notifier, RecordingNotifier, TracingNotifier};
pub use request_queue::RequestQueue;
pub use session::SessionStore;
