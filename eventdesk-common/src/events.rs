//! Event types and EventBus
//!
//! Events are broadcast via `EventBus` and serialized for SSE transmission.
//! Each event carries the owner it belongs to so streams can be partitioned.

use crate::models::{AttendanceEntry, Notification, OwnerId, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// EventDesk event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeskEvent {
    /// Live scanning toggled (Idle ↔ Active)
    ScanSessionChanged {
        owner_id: OwnerId,
        active: bool,
        timestamp: DateTime<Utc>,
    },

    /// First tap-in of a tag during the current session
    AttendanceRecorded {
        owner_id: OwnerId,
        entry: AttendanceEntry,
    },

    /// Durable notification appended to the log
    NotificationLogged {
        owner_id: OwnerId,
        notification: Notification,
    },

    /// Shift created or overwritten
    ShiftSaved {
        owner_id: OwnerId,
        shift_id: Uuid,
        /// Number of the staff member's other shifts intersecting this one
        overlapping: usize,
        timestamp: DateTime<Utc>,
    },

    /// Tag bound (or re-bound) to a person
    TagAssigned {
        owner_id: OwnerId,
        tag_id: TagId,
        timestamp: DateTime<Utc>,
    },

    /// Tag binding removed
    TagUnassigned {
        owner_id: OwnerId,
        tag_id: TagId,
        timestamp: DateTime<Utc>,
    },
}

impl DeskEvent {
    pub fn owner_id(&self) -> &OwnerId {
        match self {
            DeskEvent::ScanSessionChanged { owner_id, .. }
            | DeskEvent::AttendanceRecorded { owner_id, .. }
            | DeskEvent::NotificationLogged { owner_id, .. }
            | DeskEvent::ShiftSaved { owner_id, .. }
            | DeskEvent::TagAssigned { owner_id, .. }
            | DeskEvent::TagUnassigned { owner_id, .. } => owner_id,
        }
    }

    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            DeskEvent::ScanSessionChanged { .. } => "ScanSessionChanged",
            DeskEvent::AttendanceRecorded { .. } => "AttendanceRecorded",
            DeskEvent::NotificationLogged { .. } => "NotificationLogged",
            DeskEvent::ShiftSaved { .. } => "ShiftSaved",
            DeskEvent::TagAssigned { .. } => "TagAssigned",
            DeskEvent::TagUnassigned { .. } => "TagUnassigned",
        }
    }
}

/// Broadcast bus shared by all components of one process
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DeskEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of receivers; having none is not an error.
    pub fn emit(&self, event: DeskEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!("No subscribers for event");
                0
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
