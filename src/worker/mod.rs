//! The background worker: lifecycle, push and notification-click handlers.

pub mod event;
pub mod svc;
