use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Browser push subscription in the shape of `PushSubscription.toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    pub expiration_time: Option<u64>, // nullable in JSON
    pub keys: PushSubscriptionKeys,
}

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Serialize)]
pub struct SubscriptionRequest<'a> {
    pub subscription: &'a PushSubscription,
    pub employee_db_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Not asked yet.
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Always true: silent pushes are not allowed.
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    #[serde(default)]
    pub public_key: String,
}

#[derive(Debug, Serialize)]
pub struct UpcomingRequest {
    pub hours: u32,
}

/// Result of `POST /api/notify/upcoming`. `notifications_sent` counts delivery
/// attempts, not confirmed deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingReport {
    pub tasks: u64,
    pub notifications_sent: u64,
}

/// What a push event turns into on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl NotificationPayload {
    /// Builds the payload from a push message body.
    ///
    /// JSON objects supply `title`, `body` and `data`; anything that does not
    /// parse as JSON becomes the body under the default title.
    pub fn from_push_data(raw: Option<&[u8]>, default_title: &str) -> Self {
        let Some(raw) = raw else {
            return NotificationPayload::plain(default_title, String::new());
        };
        let parsed = match serde_json::from_slice::<Value>(raw) {
            Ok(parsed) => parsed,
            Err(_) => {
                return NotificationPayload::plain(
                    default_title,
                    String::from_utf8_lossy(raw).into_owned(),
                );
            }
        };

        // Falsy values (null, false, 0, "") count as absent.
        let field = |name: &str| match parsed.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            value @ (Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
            _ => None,
        };
        let data = match parsed.get("data") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        NotificationPayload {
            title: field("title").unwrap_or_else(|| default_title.to_string()),
            body: field("body").unwrap_or_default(),
            data,
        }
    }

    fn plain(title: &str, body: String) -> Self {
        NotificationPayload {
            title: title.to_string(),
            body,
            data: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subscription_serializes_like_browser_json() {
        let sub = PushSubscription {
            endpoint: "https://push.example/abc".into(),
            expiration_time: None,
            keys: PushSubscriptionKeys {
                p256dh: "BEl6".into(),
                auth: "q1w2".into(),
            },
        };
        let request = SubscriptionRequest {
            subscription: &sub,
            employee_db_id: Some(7),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "subscription": {
                    "endpoint": "https://push.example/abc",
                    "expirationTime": null,
                    "keys": { "p256dh": "BEl6", "auth": "q1w2" }
                },
                "employee_db_id": 7
            })
        );
    }

    #[test]
    fn permission_state_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&PermissionState::Granted).unwrap(),
            "\"granted\""
        );
        let state: PermissionState = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(state, PermissionState::Default);
    }

    #[test]
    fn json_payload_supplies_title_body_and_data() {
        let raw = br#"{"title":"T","body":"B","data":{"taskId":3}}"#;
        let payload = NotificationPayload::from_push_data(Some(raw), "Notification");
        assert_eq!(payload.title, "T");
        assert_eq!(payload.body, "B");
        assert_eq!(payload.data.get("taskId"), Some(&json!(3)));
    }

    #[test]
    fn text_payload_becomes_body() {
        let payload = NotificationPayload::from_push_data(Some(b"hello"), "Notification");
        assert_eq!(payload.title, "Notification");
        assert_eq!(payload.body, "hello");
        assert!(payload.data.is_empty());
    }

    #[test]
    fn missing_fields_fall_back() {
        let payload = NotificationPayload::from_push_data(Some(br#"{"title":"","data":null}"#), "HR");
        assert_eq!(payload.title, "HR");
        assert_eq!(payload.body, "");
        assert!(payload.data.is_empty());

        let payload = NotificationPayload::from_push_data(Some(b"42"), "HR");
        assert_eq!(payload.title, "HR");
        assert_eq!(payload.body, "");

        let payload = NotificationPayload::from_push_data(None, "HR");
        assert_eq!(payload.title, "HR");
        assert_eq!(payload.body, "");
    }

    #[test]
    fn scalar_title_and_body_are_shown_as_text() {
        let payload = NotificationPayload::from_push_data(Some(br#"{"title":5,"body":7}"#), "HR");
        assert_eq!(payload.title, "5");
        assert_eq!(payload.body, "7");

        let payload =
            NotificationPayload::from_push_data(Some(br#"{"title":0,"body":false}"#), "HR");
        assert_eq!(payload.title, "HR");
        assert_eq!(payload.body, "");

        let payload = NotificationPayload::from_push_data(Some(br#"{"body":true}"#), "HR");
        assert_eq!(payload.body, "true");
    }

    #[test]
    fn empty_public_key_response_defaults() {
        let response: PublicKeyResponse = serde_json::from_str("{}").unwrap();
        assert!(response.public_key.is_empty());
    }
}
