use std::future::Future;

use futures::future::{BoxFuture, join_all};

use crate::{error::PushError, platform::ShownNotification};

/// Work an event handler asked the runtime to wait for.
pub type Extension = BoxFuture<'static, Result<(), PushError>>;

/// Event whose lifetime can be extended with [`ExtendableEvent::wait_until`].
///
/// The runtime must [`settle`](ExtendableEvent::settle) it before treating the
/// event as handled, or the worker may be torn down mid-work.
#[derive(Default)]
pub struct ExtendableEvent {
    extensions: Vec<Extension>,
}

impl ExtendableEvent {
    pub fn new() -> Self {
        ExtendableEvent::default()
    }

    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = Result<(), PushError>> + Send + 'static,
    {
        self.extensions.push(Box::pin(work));
    }

    pub fn pending(&self) -> usize {
        self.extensions.len()
    }

    /// Drives every extension to completion, then reports the first failure.
    pub async fn settle(self) -> Result<(), PushError> {
        join_all(self.extensions)
            .await
            .into_iter()
            .collect::<Result<Vec<()>, PushError>>()
            .map(|_| ())
    }
}

impl std::fmt::Debug for ExtendableEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendableEvent")
            .field("pending", &self.extensions.len())
            .finish()
    }
}

/// Body of a push message as delivered by the push service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessageData(Vec<u8>);

impl PushMessageData {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        PushMessageData(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Install,
    Activate,
    Push(Option<PushMessageData>),
    NotificationClick(ShownNotification),
}
