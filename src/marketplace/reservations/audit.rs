use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::domain::{ReservationId, ResourceId, UserId};

/// Activity entry emitted after a successful admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEvent {
    pub kind: &'static str,
    pub resource_id: ResourceId,
    pub reservation_id: ReservationId,
    pub guest_id: UserId,
    pub recorded_at: DateTime<Utc>,
}

/// Best-effort activity sink. `append` must never block or fail the caller;
/// delivery failures are the implementation's problem to swallow and log.
pub trait ActivityLog: Send + Sync {
    fn append(&self, event: ActivityEvent);
}

/// Activity log backed by a bounded channel; a detached consumer drains it.
/// Overflow and a closed receiver both drop the event with a warning.
pub struct ChannelActivityLog {
    tx: mpsc::Sender<ActivityEvent>,
}

impl ChannelActivityLog {
    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<ActivityEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Spawn a consumer that mirrors events into the tracing stream. Useful
    /// for deployments without a dedicated activity pipeline.
    pub fn spawn_tracing_drain(mut rx: mpsc::Receiver<ActivityEvent>) {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                debug!(
                    kind = event.kind,
                    resource = %event.resource_id.0,
                    reservation = %event.reservation_id.0,
                    guest = %event.guest_id.0,
                    "activity recorded"
                );
            }
        });
    }
}

impl ActivityLog for ChannelActivityLog {
    fn append(&self, event: ActivityEvent) {
        if let Err(err) = self.tx.try_send(event) {
            warn!(error = %err, "activity event dropped");
        }
    }
}
