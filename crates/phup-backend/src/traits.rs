use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::error::BackendError;
use crate::types::{OperationEvent, OperationRequest, PhpVersion};

/// Handle to one in-flight background operation.
///
/// Owns the ordered event stream and the worker task. At most one operation
/// should be outstanding per caller; nothing here cancels a running
/// operation, the worker always runs its command list to the end.
pub struct OperationHandle {
    events: UnboundedReceiver<OperationEvent>,
    task: JoinHandle<()>,
}

impl OperationHandle {
    #[must_use]
    pub fn new(events: UnboundedReceiver<OperationEvent>, task: JoinHandle<()>) -> Self {
        Self { events, task }
    }

    /// Receive the next event. Returns `None` once the worker is gone and
    /// the stream is drained; a well-behaved worker ends the stream with
    /// exactly one [`OperationEvent::Completed`].
    pub async fn recv(&mut self) -> Option<OperationEvent> {
        self.events.recv().await
    }

    /// Wait for the worker task itself to finish. Call after draining the
    /// event stream.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

#[async_trait]
pub trait RuntimeManager: Send + Sync {
    fn name(&self) -> &'static str;

    /// Enumerate installed versions: sorted, deduplicated, freshly computed
    /// on every call.
    async fn list_installed(&self) -> Result<Vec<PhpVersion>, BackendError>;

    /// The version the system-wide `php` currently resolves to, if any.
    async fn active_version(&self) -> Result<Option<PhpVersion>, BackendError>;

    /// Point the system-wide `php` at the given version.
    async fn activate(&self, version: &PhpVersion) -> Result<(), BackendError>;

    /// Kick off one orchestrated operation on a background task and hand
    /// back its event stream.
    fn start(&self, request: OperationRequest) -> OperationHandle;
}
