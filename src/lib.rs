//! Client side of the HR procedure tracker: web-push registration, the
//! background worker that shows task reminders, and a typed client for the
//! employee/task endpoints.

pub mod cfg;
pub mod controller;
pub mod error;
pub mod hr;
pub mod http_client;
pub mod notification;
pub mod platform;
pub mod worker;
