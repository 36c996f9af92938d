//! Directory event bus for presentation layers
//!
//! The [`ListController`](crate::controller::ListController) publishes an event
//! every time the displayed page changes, a stale pipeline run is dropped, a
//! mutation is reconciled, or something fails. Views subscribe instead of polling.
//!
//! ```text
//! ListController ──▶ EventBus::publish() ──▶ broadcast channel ──▶ table view
//!                                                              ──▶ pager / toasts
//! ```

use crate::core::filter::EmptyReason;
use crate::core::record::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Something the list view may need to react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryEvent {
    /// A pipeline run finished and its page is now displayed
    PageLoaded {
        generation: u64,
        page: usize,
        total_pages: usize,
        records: usize,
        empty: Option<EmptyReason>,
    },
    /// A pipeline run finished after a newer one had started and was dropped
    RunDiscarded { generation: u64, latest: u64 },
    /// A record was created and appended locally
    RecordCreated { id: RecordId },
    /// A record was updated and replaced locally
    RecordUpdated { id: RecordId },
    /// A record was deleted and removed locally
    RecordDeleted { id: RecordId },
    /// A fetch or mutation failed
    Failed { message: String },
}

impl DirectoryEvent {
    /// Stable name of the event variant
    pub fn action(&self) -> &'static str {
        match self {
            DirectoryEvent::PageLoaded { .. } => "page_loaded",
            DirectoryEvent::RunDiscarded { .. } => "run_discarded",
            DirectoryEvent::RecordCreated { .. } => "record_created",
            DirectoryEvent::RecordUpdated { .. } => "record_updated",
            DirectoryEvent::RecordDeleted { .. } => "record_deleted",
            DirectoryEvent::Failed { .. } => "failed",
        }
    }

    /// Record the event is about, if any
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            DirectoryEvent::RecordCreated { id }
            | DirectoryEvent::RecordUpdated { id }
            | DirectoryEvent::RecordDeleted { id } => Some(id),
            _ => None,
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: DirectoryEvent,
}

impl EventEnvelope {
    pub fn new(event: DirectoryEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; every clone publishes to the same subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// `capacity` is how many events a slow subscriber may fall behind before
    /// it starts seeing `Lagged`
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers; never blocks
    ///
    /// Returns the number of receivers that will see the event.
    pub fn publish(&self, event: DirectoryEvent) -> usize {
        // Err only means nobody is listening
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
