//! Durable notification log entries

use super::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub owner_id: OwnerId,
}

impl Notification {
    /// Message logged the first time a person taps in during a session
    pub fn tapped_in_message(person_name: &str) -> String {
        format!("{} has tapped in.", person_name)
    }
}
