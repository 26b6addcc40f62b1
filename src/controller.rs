use std::sync::Arc;

use crate::{
    error::PushError,
    notification::{
        model::{PushSubscription, UpcomingReport},
        svc::Notification,
    },
    platform::Alert,
};

pub const PERMISSION_REQUIRED: &str = "通知の許可が必要です";
pub const PUSH_REGISTERED: &str = "プッシュ通知を登録しました";

/// The page's push buttons: register this browser, and send reminders for
/// upcoming deadlines.
pub struct PushController {
    notification: Notification,
    alert: Arc<dyn Alert>,
}

impl PushController {
    pub fn new(notification: Notification, alert: Arc<dyn Alert>) -> Self {
        PushController {
            notification,
            alert,
        }
    }

    /// Permission and platform problems are alerted and resolve to `Ok(None)`;
    /// network and subscription failures are returned for the caller to show.
    pub async fn register_push(
        &self,
        employee_db_id: Option<i64>,
    ) -> Result<Option<PushSubscription>, PushError> {
        match self.notification.register(employee_db_id).await {
            Ok(subscription) => {
                self.alert.alert(PUSH_REGISTERED);
                Ok(Some(subscription))
            }
            Err(PushError::PermissionDenied) => {
                self.alert.alert(PERMISSION_REQUIRED);
                Ok(None)
            }
            Err(err) if err.needs_alert() => {
                self.alert.alert(&err.to_string());
                Ok(None)
            }
            Err(err) => {
                log::error!("[Push] Registration failed: {}", err);
                Err(err)
            }
        }
    }

    pub async fn notify_upcoming(&self, hours: u32) -> Result<UpcomingReport, PushError> {
        let report = self.notification.trigger_upcoming(hours).await?;
        self.alert.alert(&format!(
            "通知対象タスク: {}, 送信件数(試行): {}",
            report.tasks, report.notifications_sent
        ));
        Ok(report)
    }
}
