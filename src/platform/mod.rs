//! Browser capabilities the push flow and the background worker depend on.
//!
//! Each browser global (`Notification`, `navigator.serviceWorker`, the
//! worker's `self`) is an object-safe trait so a host can plug in a real
//! binding and tests can plug in [`memory`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    error::PushError,
    notification::model::{PermissionState, PushSubscription, SubscribeOptions},
};

/// The `Notification` permission API.
#[async_trait]
pub trait NotificationPermission: Send + Sync {
    fn current(&self) -> PermissionState;

    /// Shows the native prompt. The browser answers at most once per origin.
    async fn request(&self) -> PermissionState;
}

/// `navigator.serviceWorker`.
#[async_trait]
pub trait ServiceWorkerContainer: Send + Sync {
    async fn get_registration(&self, scope: &str) -> Result<Option<WorkerRegistration>, PushError>;

    async fn register(&self, script_url: &str, scope: &str) -> Result<WorkerRegistration, PushError>;
}

/// `registration.pushManager`.
#[async_trait]
pub trait PushManager: Send + Sync {
    async fn subscribe(
        &self,
        registration: &WorkerRegistration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription, PushError>;
}

/// Blocking `alert()` in the page.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    pub id: u64,
    pub script_url: String,
    pub scope: String,
}

/// The page-side view of the browser. `None` means the API is absent.
#[derive(Clone, Default)]
pub struct Navigator {
    pub notifications: Option<Arc<dyn NotificationPermission>>,
    pub service_worker: Option<Arc<dyn ServiceWorkerContainer>>,
    pub push_manager: Option<Arc<dyn PushManager>>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("notifications", &self.notifications.is_some())
            .field("service_worker", &self.service_worker.is_some())
            .field("push_manager", &self.push_manager.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOptions {
    pub body: String,
    pub data: Map<String, Value>,
}

/// A notification the worker has put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    pub id: u64,
    pub title: String,
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// The worker's `self`: registration, clients and lifecycle calls.
#[async_trait]
pub trait WorkerGlobal: Send + Sync {
    async fn skip_waiting(&self) -> Result<(), PushError>;

    async fn claim_clients(&self) -> Result<(), PushError>;

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<ShownNotification, PushError>;

    fn close_notification(&self, notification: &ShownNotification);

    async fn match_clients(&self, include_uncontrolled: bool) -> Result<Vec<WindowClient>, PushError>;

    async fn focus(&self, client: &WindowClient) -> Result<(), PushError>;

    async fn open_window(&self, url: &str) -> Result<(), PushError>;
}
