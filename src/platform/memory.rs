//! In-memory browser used by tests and by the CLI's worker simulation.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use super::{
    Alert, Navigator, NotificationOptions, NotificationPermission, PushManager, ServiceWorkerContainer,
    ShownNotification, WindowClient, WorkerGlobal, WorkerRegistration,
};
use crate::{
    error::PushError,
    notification::model::{PermissionState, PushSubscription, PushSubscriptionKeys, SubscribeOptions},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct BrowserState {
    permission: PermissionState,
    prompt_answer: PermissionState,
    prompts: usize,
    registrations: Vec<WorkerRegistration>,
    register_calls: usize,
    subscriptions: Vec<(u64, Vec<u8>, PushSubscription)>,
    subscribe_calls: usize,
    next_id: u64,
}

/// Page-side browser: permission, worker container and push manager.
#[derive(Debug)]
pub struct MemoryBrowser {
    state: Mutex<BrowserState>,
}

impl MemoryBrowser {
    pub fn new(permission: PermissionState) -> Arc<Self> {
        Arc::new(MemoryBrowser {
            state: Mutex::new(BrowserState {
                permission,
                prompt_answer: PermissionState::Granted,
                prompts: 0,
                registrations: Vec::new(),
                register_calls: 0,
                subscriptions: Vec::new(),
                subscribe_calls: 0,
                next_id: 1,
            }),
        })
    }

    /// What the user clicks when the permission prompt appears.
    pub fn answer_prompt_with(&self, answer: PermissionState) {
        lock(&self.state).prompt_answer = answer;
    }

    pub fn set_permission(&self, permission: PermissionState) {
        lock(&self.state).permission = permission;
    }

    /// A navigator exposing every API.
    pub fn navigator(self: &Arc<Self>) -> Navigator {
        Navigator {
            notifications: Some(self.clone()),
            service_worker: Some(self.clone()),
            push_manager: Some(self.clone()),
        }
    }

    pub fn prompts(&self) -> usize {
        lock(&self.state).prompts
    }

    pub fn register_calls(&self) -> usize {
        lock(&self.state).register_calls
    }

    pub fn registrations(&self) -> Vec<WorkerRegistration> {
        lock(&self.state).registrations.clone()
    }

    pub fn subscribe_calls(&self) -> usize {
        lock(&self.state).subscribe_calls
    }

    /// Raw application server key of the most recent subscription.
    pub fn last_server_key(&self) -> Option<Vec<u8>> {
        lock(&self.state)
            .subscriptions
            .last()
            .map(|(_, key, _)| key.clone())
    }
}

#[async_trait]
impl NotificationPermission for MemoryBrowser {
    fn current(&self) -> PermissionState {
        lock(&self.state).permission
    }

    async fn request(&self) -> PermissionState {
        let mut state = lock(&self.state);
        if state.permission == PermissionState::Default {
            let answer = state.prompt_answer;
            state.prompts += 1;
            state.permission = answer;
        }
        state.permission
    }
}

#[async_trait]
impl ServiceWorkerContainer for MemoryBrowser {
    async fn get_registration(&self, scope: &str) -> Result<Option<WorkerRegistration>, PushError> {
        Ok(lock(&self.state)
            .registrations
            .iter()
            .find(|r| r.scope == scope)
            .cloned())
    }

    async fn register(&self, script_url: &str, scope: &str) -> Result<WorkerRegistration, PushError> {
        let mut state = lock(&self.state);
        state.register_calls += 1;
        if let Some(existing) = state.registrations.iter_mut().find(|r| r.scope == scope) {
            existing.script_url = script_url.to_string();
            return Ok(existing.clone());
        }
        let registration = WorkerRegistration {
            id: state.next_id,
            script_url: script_url.to_string(),
            scope: scope.to_string(),
        };
        state.next_id += 1;
        state.registrations.push(registration.clone());
        Ok(registration)
    }
}

#[async_trait]
impl PushManager for MemoryBrowser {
    async fn subscribe(
        &self,
        registration: &WorkerRegistration,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription, PushError> {
        let mut state = lock(&self.state);
        state.subscribe_calls += 1;
        if state.permission != PermissionState::Granted {
            return Err(PushError::Subscription(
                "registration failed - permission denied".into(),
            ));
        }
        if !options.user_visible_only {
            return Err(PushError::Subscription("userVisibleOnly must be true".into()));
        }
        if options.application_server_key.is_empty() {
            return Err(PushError::Subscription("applicationServerKey is empty".into()));
        }

        if let Some((_, key, sub)) = state
            .subscriptions
            .iter()
            .find(|(id, _, _)| *id == registration.id)
        {
            if *key == options.application_server_key {
                return Ok(sub.clone());
            }
            return Err(PushError::Subscription(
                "a subscription with a different applicationServerKey already exists".into(),
            ));
        }

        let id = state.next_id;
        state.next_id += 1;
        let subscription = PushSubscription {
            endpoint: format!("https://push.memory.invalid/send/{id}"),
            expiration_time: None,
            keys: PushSubscriptionKeys {
                p256dh: URL_SAFE_NO_PAD.encode(format!("p256dh-{id}")),
                auth: URL_SAFE_NO_PAD.encode(format!("auth-{id}")),
            },
        };
        state.subscriptions.push((
            registration.id,
            options.application_server_key.clone(),
            subscription.clone(),
        ));
        Ok(subscription)
    }
}

#[derive(Debug, Default)]
struct WorkerState {
    skipped_waiting: bool,
    claimed: bool,
    shown: Vec<ShownNotification>,
    closed: Vec<u64>,
    clients: Vec<WindowClient>,
    focused: Vec<String>,
    opened: Vec<String>,
    next_id: u64,
}

/// Worker-side global: records every lifecycle and notification call.
#[derive(Debug, Default)]
pub struct MemoryWorker {
    state: Mutex<WorkerState>,
    show_delay: Option<Duration>,
}

impl MemoryWorker {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryWorker::default())
    }

    /// Makes `show_notification` take `delay` before it lands.
    pub fn with_show_delay(delay: Duration) -> Arc<Self> {
        Arc::new(MemoryWorker {
            state: Mutex::default(),
            show_delay: Some(delay),
        })
    }

    pub fn add_client(&self, url: &str) -> WindowClient {
        let mut state = lock(&self.state);
        let client = WindowClient {
            id: format!("client-{}", state.clients.len() + 1),
            url: url.to_string(),
        };
        state.clients.push(client.clone());
        client
    }

    pub fn skipped_waiting(&self) -> bool {
        lock(&self.state).skipped_waiting
    }

    pub fn claimed(&self) -> bool {
        lock(&self.state).claimed
    }

    pub fn shown(&self) -> Vec<ShownNotification> {
        lock(&self.state).shown.clone()
    }

    pub fn closed(&self) -> Vec<u64> {
        lock(&self.state).closed.clone()
    }

    pub fn focused(&self) -> Vec<String> {
        lock(&self.state).focused.clone()
    }

    pub fn opened(&self) -> Vec<String> {
        lock(&self.state).opened.clone()
    }
}

#[async_trait]
impl WorkerGlobal for MemoryWorker {
    async fn skip_waiting(&self) -> Result<(), PushError> {
        lock(&self.state).skipped_waiting = true;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), PushError> {
        lock(&self.state).claimed = true;
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<ShownNotification, PushError> {
        if let Some(delay) = self.show_delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = lock(&self.state);
        state.next_id += 1;
        let shown = ShownNotification {
            id: state.next_id,
            title: title.to_string(),
            options: options.clone(),
        };
        state.shown.push(shown.clone());
        Ok(shown)
    }

    fn close_notification(&self, notification: &ShownNotification) {
        lock(&self.state).closed.push(notification.id);
    }

    async fn match_clients(&self, _include_uncontrolled: bool) -> Result<Vec<WindowClient>, PushError> {
        Ok(lock(&self.state).clients.clone())
    }

    async fn focus(&self, client: &WindowClient) -> Result<(), PushError> {
        let mut state = lock(&self.state);
        if !state.clients.iter().any(|c| c.id == client.id) {
            return Err(PushError::Worker(format!("client {} is gone", client.id)));
        }
        state.focused.push(client.id.clone());
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), PushError> {
        let mut state = lock(&self.state);
        state.opened.push(url.to_string());
        let client = WindowClient {
            id: format!("client-{}", state.clients.len() + 1),
            url: url.to_string(),
        };
        state.clients.push(client);
        Ok(())
    }
}

/// Collects alert messages instead of blocking.
#[derive(Debug, Default)]
pub struct RecordingAlert {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlert {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingAlert::default())
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Alert for RecordingAlert {
    fn alert(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}
