use std::sync::Arc;

use super::event::{ExtendableEvent, PushMessageData, WorkerEvent};
use crate::{
    cfg::WorkerConfig,
    error::PushError,
    notification::model::NotificationPayload,
    platform::{NotificationOptions, ShownNotification, WorkerGlobal},
};

/// Background worker handlers.
///
/// Holds no state between events; everything lives behind the injected
/// [`WorkerGlobal`]. Async work is always handed to `wait_until`.
#[derive(Clone)]
pub struct ServiceWorker {
    global: Arc<dyn WorkerGlobal>,
    config: WorkerConfig,
}

impl ServiceWorker {
    pub fn new(global: Arc<dyn WorkerGlobal>, config: WorkerConfig) -> Self {
        ServiceWorker { global, config }
    }

    /// Runs the matching handler and joins its lifetime extensions.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<(), PushError> {
        let mut extendable = ExtendableEvent::new();
        match &event {
            WorkerEvent::Install => self.on_install(&mut extendable),
            WorkerEvent::Activate => self.on_activate(&mut extendable),
            WorkerEvent::Push(data) => self.on_push(&mut extendable, data.as_ref()),
            WorkerEvent::NotificationClick(notification) => {
                self.on_notification_click(&mut extendable, notification)
            }
        }
        let result = extendable.settle().await;
        if let Err(err) = &result {
            log::error!("[Worker] {:?} failed: {}", event, err);
        }
        result
    }

    /// Activates the new worker without waiting for old ones to go away.
    pub fn on_install(&self, event: &mut ExtendableEvent) {
        let global = self.global.clone();
        event.wait_until(async move { global.skip_waiting().await });
    }

    /// Takes control of already open pages.
    pub fn on_activate(&self, event: &mut ExtendableEvent) {
        let global = self.global.clone();
        event.wait_until(async move { global.claim_clients().await });
    }

    pub fn on_push(&self, event: &mut ExtendableEvent, data: Option<&PushMessageData>) {
        let payload = NotificationPayload::from_push_data(
            data.map(PushMessageData::as_bytes),
            &self.config.default_title,
        );
        log::debug!("[Worker] Push received: {}", payload.title);

        let global = self.global.clone();
        event.wait_until(async move {
            let options = NotificationOptions {
                body: payload.body,
                data: payload.data,
            };
            global.show_notification(&payload.title, &options).await?;
            Ok(())
        });
    }

    /// Closes the notification, then focuses an open window or opens the app.
    pub fn on_notification_click(&self, event: &mut ExtendableEvent, notification: &ShownNotification) {
        self.global.close_notification(notification);

        let global = self.global.clone();
        let url = self.config.app_root.clone();
        event.wait_until(async move {
            let clients = global.match_clients(true).await?;
            match clients.first() {
                Some(client) => global.focus(client).await,
                None => global.open_window(&url).await,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryWorker;
    use serde_json::{Map, json};
    use std::time::Duration;

    fn worker(global: &Arc<MemoryWorker>) -> ServiceWorker {
        ServiceWorker::new(global.clone(), WorkerConfig::default())
    }

    fn clicked(id: u64) -> ShownNotification {
        ShownNotification {
            id,
            title: "Task due".into(),
            options: NotificationOptions {
                body: String::new(),
                data: Map::new(),
            },
        }
    }

    #[tokio::test]
    async fn install_skips_waiting_and_activate_claims() {
        let global = MemoryWorker::new();
        let sw = worker(&global);
        sw.dispatch(WorkerEvent::Install).await.unwrap();
        assert!(global.skipped_waiting());
        assert!(!global.claimed());
        sw.dispatch(WorkerEvent::Activate).await.unwrap();
        assert!(global.claimed());
    }

    #[tokio::test]
    async fn json_push_shows_title_and_body() {
        let global = MemoryWorker::new();
        let data = PushMessageData::new(r#"{"title":"T","body":"B","data":{"taskId":9}}"#);
        worker(&global)
            .dispatch(WorkerEvent::Push(Some(data)))
            .await
            .unwrap();

        let shown = global.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "T");
        assert_eq!(shown[0].options.body, "B");
        assert_eq!(shown[0].options.data.get("taskId"), Some(&json!(9)));
    }

    #[tokio::test]
    async fn text_push_uses_default_title() {
        let global = MemoryWorker::new();
        worker(&global)
            .dispatch(WorkerEvent::Push(Some(PushMessageData::new("hello"))))
            .await
            .unwrap();

        let shown = global.shown();
        assert_eq!(shown[0].title, crate::cfg::DEFAULT_TITLE);
        assert_eq!(shown[0].options.body, "hello");
        assert!(shown[0].options.data.is_empty());
    }

    #[tokio::test]
    async fn empty_push_still_shows_a_notification() {
        let global = MemoryWorker::new();
        worker(&global).dispatch(WorkerEvent::Push(None)).await.unwrap();
        assert_eq!(global.shown()[0].options.body, "");
    }

    #[tokio::test]
    async fn dispatch_returns_only_after_display() {
        let global = MemoryWorker::with_show_delay(Duration::from_millis(30));
        let sw = worker(&global);
        let mut event = ExtendableEvent::new();
        sw.on_push(&mut event, Some(&PushMessageData::new("later")));
        assert!(global.shown().is_empty());
        assert_eq!(event.pending(), 1);

        event.settle().await.unwrap();
        assert_eq!(global.shown().len(), 1);
    }

    #[tokio::test]
    async fn click_focuses_first_open_client() {
        let global = MemoryWorker::new();
        let first = global.add_client("/employees");
        global.add_client("/tasks");

        worker(&global)
            .dispatch(WorkerEvent::NotificationClick(clicked(3)))
            .await
            .unwrap();

        assert_eq!(global.closed(), vec![3]);
        assert_eq!(global.focused(), vec![first.id]);
        assert!(global.opened().is_empty());
    }

    #[tokio::test]
    async fn click_without_clients_opens_app_root() {
        let global = MemoryWorker::new();
        worker(&global)
            .dispatch(WorkerEvent::NotificationClick(clicked(1)))
            .await
            .unwrap();

        assert_eq!(global.closed(), vec![1]);
        assert_eq!(global.opened(), vec!["/".to_string()]);
        assert!(global.focused().is_empty());
    }
}
