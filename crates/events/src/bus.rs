//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] carries [`DirectoryEvent`]s from the handlers that mutate
//! the directory to whoever caches derived state (the org chart store). It
//! is shared via `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use orgdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DirectoryEvent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryEventKind {
    /// An employee's manager changed.
    ReportsToChanged,
    /// Derived hierarchy state must be rebuilt from scratch.
    HierarchyReset,
}

/// A change made to one tenant's directory.
///
/// Constructed via [`DirectoryEvent::new`] and enriched with
/// [`with_employee`](DirectoryEvent::with_employee).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEvent {
    pub kind: DirectoryEventKind,

    /// Tenant (company) the change belongs to.
    pub tenant: String,

    /// Employee the change is about, if any.
    pub employee_id: Option<DbId>,

    pub timestamp: DateTime<Utc>,
}

impl DirectoryEvent {
    pub fn new(kind: DirectoryEventKind, tenant: impl Into<String>) -> Self {
        Self {
            kind,
            tenant: tenant.into(),
            employee_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_employee(mut self, employee_id: DbId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use orgdesk_events::bus::{DirectoryEvent, DirectoryEventKind, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DirectoryEvent::new(DirectoryEventKind::HierarchyReset, "tenant-1"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DirectoryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: DirectoryEvent) {
        tracing::debug!(kind = ?event.kind, tenant = %event.tenant, "Publishing directory event");
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            DirectoryEvent::new(DirectoryEventKind::ReportsToChanged, "acme").with_employee(42),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, DirectoryEventKind::ReportsToChanged);
        assert_eq!(received.tenant, "acme");
        assert_eq!(received.employee_id, Some(42));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DirectoryEvent::new(DirectoryEventKind::HierarchyReset, "acme"));

        assert_eq!(rx1.recv().await.unwrap().kind, DirectoryEventKind::HierarchyReset);
        assert_eq!(rx2.recv().await.unwrap().kind, DirectoryEventKind::HierarchyReset);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(DirectoryEvent::new(DirectoryEventKind::HierarchyReset, "acme"));
    }

    #[test]
    fn serializes_camel_case() {
        let event = DirectoryEvent::new(DirectoryEventKind::ReportsToChanged, "acme").with_employee(7);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "reports_to_changed");
        assert_eq!(json["employeeId"], 7);
    }
}
