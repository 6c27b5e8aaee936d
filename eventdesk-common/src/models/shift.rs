//! Rota entries

use super::OwnerId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assignment of one staff member to one event group for a time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: Uuid,
    pub event_id: Uuid,
    pub staff_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub owner_id: OwnerId,
}

impl Shift {
    /// Half-open window intersection with another window
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// Create-or-update payload; `id` present means overwrite that shift
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub event_id: Uuid,
    pub staff_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftDraft {
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(Error::Validation(format!(
                "shift end {} must be after start {}",
                self.end.to_rfc3339(),
                self.start.to_rfc3339()
            )));
        }
        Ok(())
    }
}
