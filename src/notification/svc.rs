use super::{
    key::url_b64_to_bytes,
    model::{
        PermissionState, PublicKeyResponse, PushSubscription, SubscribeOptions, SubscriptionRequest,
        UpcomingReport, UpcomingRequest,
    },
};
use crate::{
    cfg::WorkerConfig,
    error::PushError,
    http_client::{HttpClient, HttpMethod},
    platform::{Navigator, WorkerRegistration},
};

pub const PUBLIC_KEY_PATH: &str = "/api/webpush/public_key";
pub const SUBSCRIPTIONS_PATH: &str = "/api/subscriptions";
pub const NOTIFY_UPCOMING_PATH: &str = "/api/notify/upcoming";

/// Page-side push registration: permission, worker, key, subscription.
#[derive(Debug, Clone)]
pub struct Notification {
    navigator: Navigator,
    http: HttpClient,
    worker: WorkerConfig,
}

impl Notification {
    pub fn new(navigator: Navigator, http: HttpClient, worker: WorkerConfig) -> Self {
        Notification {
            navigator,
            http,
            worker,
        }
    }

    /// Current permission, prompting only while it is still `default`.
    pub async fn ask_permission(&self) -> PermissionState {
        let Some(notifications) = &self.navigator.notifications else {
            return PermissionState::Denied;
        };
        match notifications.current() {
            PermissionState::Default => {
                log::info!("[Push] Requesting notification permission");
                notifications.request().await
            }
            state => state,
        }
    }

    /// Registers the worker script, reusing a matching registration.
    /// `Ok(None)` when the platform has no worker support.
    pub async fn register_worker(&self) -> Result<Option<WorkerRegistration>, PushError> {
        let Some(container) = &self.navigator.service_worker else {
            return Ok(None);
        };
        let WorkerConfig {
            script_url, scope, ..
        } = &self.worker;
        if let Some(existing) = container.get_registration(scope).await? {
            if existing.script_url == *script_url {
                log::debug!("[Push] Reusing worker registration {}", existing.id);
                return Ok(Some(existing));
            }
        }
        let registration = container.register(script_url, scope).await?;
        log::info!(
            "[Push] Registered {} for scope {}",
            registration.script_url,
            registration.scope
        );
        Ok(Some(registration))
    }

    pub async fn public_key(&self) -> Result<String, PushError> {
        let response: PublicKeyResponse = self.http.get(PUBLIC_KEY_PATH).await?;
        Ok(response.public_key)
    }

    /// Subscribes through the browser and stores the subscription server-side.
    ///
    /// Returns `Ok(None)` without touching the network when the registration,
    /// the push manager or the key is missing.
    pub async fn subscribe(
        &self,
        registration: Option<&WorkerRegistration>,
        public_key: Option<&str>,
        employee_db_id: Option<i64>,
    ) -> Result<Option<PushSubscription>, PushError> {
        let (Some(registration), Some(push_manager)) = (registration, &self.navigator.push_manager)
        else {
            return Ok(None);
        };
        let Some(public_key) = public_key.filter(|k| !k.is_empty()) else {
            return Ok(None);
        };

        let options = SubscribeOptions {
            user_visible_only: true,
            application_server_key: url_b64_to_bytes(public_key)?,
        };
        let subscription = push_manager.subscribe(registration, &options).await?;

        let request = SubscriptionRequest {
            subscription: &subscription,
            employee_db_id,
        };
        let _ack: serde_json::Value = self
            .http
            .fetch(HttpMethod::POST, SUBSCRIPTIONS_PATH, Some(&request))
            .await?;
        log::info!(
            "[Push] Stored subscription {} (employee {:?})",
            subscription.endpoint,
            employee_db_id
        );
        Ok(Some(subscription))
    }

    /// Asks the server to push reminders for tasks due within `hours`.
    pub async fn trigger_upcoming(&self, hours: u32) -> Result<UpcomingReport, PushError> {
        let report: UpcomingReport = self
            .http
            .fetch(
                HttpMethod::POST,
                NOTIFY_UPCOMING_PATH,
                Some(&UpcomingRequest { hours }),
            )
            .await?;
        log::info!(
            "[Push] {} upcoming tasks, {} notifications attempted",
            report.tasks,
            report.notifications_sent
        );
        Ok(report)
    }

    /// Runs permission → worker → key → subscribe, stopping at the first failure.
    pub async fn register(&self, employee_db_id: Option<i64>) -> Result<PushSubscription, PushError> {
        self.granted_permission().await?;
        let registration = self
            .register_worker()
            .await?
            .ok_or(PushError::UnsupportedPlatform("service worker"))?;
        let public_key = self.non_empty_public_key().await?;
        self.subscribe(Some(&registration), Some(&public_key), employee_db_id)
            .await?
            .ok_or(PushError::UnsupportedPlatform("push manager"))
    }

    async fn granted_permission(&self) -> Result<(), PushError> {
        match self.ask_permission().await {
            PermissionState::Granted => Ok(()),
            state => {
                log::warn!("[Push] Notification permission is {:?}", state);
                Err(PushError::PermissionDenied)
            }
        }
    }

    async fn non_empty_public_key(&self) -> Result<String, PushError> {
        let key = self.public_key().await?;
        if key.is_empty() {
            return Err(PushError::MissingPublicKey);
        }
        Ok(key)
    }
}
