/// Everything that can stop the push registration flow or a worker event.
///
/// Every stage fails fast: the first error aborts the remaining chain and is
/// returned as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    /// The user (or the platform) did not grant notification permission.
    #[error("notification permission was not granted")]
    PermissionDenied,

    /// A browser API the flow needs is missing.
    #[error("{0} is not supported on this platform")]
    UnsupportedPlatform(&'static str),

    /// Transport failure or non-2xx response. Carries the response body text,
    /// or `HTTP <status>` when the body was empty.
    #[error("{0}")]
    Network(String),

    /// The platform rejected the subscribe call, or the key was malformed.
    #[error("{0}")]
    Subscription(String),

    /// The server has no push key configured.
    #[error("server returned an empty push key")]
    MissingPublicKey,

    /// A worker-global call (show, focus, open...) failed.
    #[error("worker error: {0}")]
    Worker(String),
}

impl PushError {
    /// Errors the UI reports through a blocking alert instead of free text.
    pub fn needs_alert(&self) -> bool {
        matches!(
            self,
            PushError::PermissionDenied | PushError::UnsupportedPlatform(_)
        )
    }

    pub(crate) fn from_status(status: u16, body: String) -> Self {
        if body.is_empty() {
            PushError::Network(format!("HTTP {status}"))
        } else {
            PushError::Network(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_body_text() {
        assert_eq!(
            PushError::from_status(500, "boom".to_string()).to_string(),
            "boom"
        );
        assert_eq!(
            PushError::from_status(502, String::new()).to_string(),
            "HTTP 502"
        );
    }

    #[test]
    fn only_permission_and_platform_errors_alert() {
        assert!(PushError::PermissionDenied.needs_alert());
        assert!(PushError::UnsupportedPlatform("service worker").needs_alert());
        assert!(!PushError::Network("down".into()).needs_alert());
        assert!(!PushError::Subscription("revoked".into()).needs_alert());
        assert!(!PushError::MissingPublicKey.needs_alert());
    }
}
