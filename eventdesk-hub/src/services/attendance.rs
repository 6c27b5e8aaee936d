//! Attendance feed
//!
//! Session-scoped list of resolved tap-ins. Each tag is recorded at most
//! once per session; the first tap also appends a durable notification.
//! The list itself is never persisted and starts empty with every session.

use crate::db::notifications;
use crate::services::tag_registry;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use eventdesk_common::events::{DeskEvent, EventBus};
use eventdesk_common::models::{AttendanceEntry, Notification, PersonType, TagId};
use eventdesk_common::{time, uuid_utils, OwnerId, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What happened to one scanned tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// First tap of this tag in the session
    Recorded { entry: AttendanceEntry },
    /// Tag already tapped in this session
    Duplicate,
    /// No assignment for this tag
    UnknownTag,
    /// Blank tag id
    Ignored,
}

/// Projections over the current session's entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub total_participants: usize,
    pub total_audience: usize,
    pub total_staff: usize,
}

pub struct AttendanceFeed {
    owner: OwnerId,
    db: SqlitePool,
    event_bus: EventBus,
    entries: Vec<AttendanceEntry>,
    seen: HashSet<TagId>,
}

impl AttendanceFeed {
    pub fn new(owner: OwnerId, db: SqlitePool, event_bus: EventBus) -> Self {
        Self {
            owner,
            db,
            event_bus,
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Entries in arrival order
    pub fn entries(&self) -> &[AttendanceEntry] {
        &self.entries
    }

    pub fn counts(&self) -> AttendanceCounts {
        let total_staff = self
            .entries
            .iter()
            .filter(|e| e.person_type == PersonType::Staff)
            .count();

        AttendanceCounts {
            total_participants: self.entries.len(),
            total_audience: self.entries.len() - total_staff,
            total_staff,
        }
    }

    /// Staff entries whose tap-in falls on the given local date
    pub fn staff_scanned_on(&self, date: NaiveDate, offset: FixedOffset) -> usize {
        self.entries
            .iter()
            .filter(|e| e.person_type == PersonType::Staff)
            .filter(|e| time::local_date(e.timestamp, offset) == date)
            .count()
    }

    /// Resolve one raw scan against the tag registry
    ///
    /// Store errors from the lookup propagate and leave the feed unchanged.
    /// A failed notification write does not undo the recorded entry.
    pub async fn on_tag_scanned(&mut self, raw_tag_id: &str) -> Result<ScanOutcome> {
        self.on_tag_scanned_at(raw_tag_id, time::now()).await
    }

    pub async fn on_tag_scanned_at(
        &mut self,
        raw_tag_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome> {
        let Some(tag_id) = TagId::normalize(raw_tag_id) else {
            return Ok(ScanOutcome::Ignored);
        };

        if self.seen.contains(&tag_id) {
            debug!(tag_id = %tag_id, "Tag already recorded this session");
            return Ok(ScanOutcome::Duplicate);
        }

        let Some(assignment) = tag_registry::lookup_tag(&self.db, &self.owner, &tag_id).await?
        else {
            warn!(tag_id = %tag_id, owner = %self.owner, "Scanned tag is not assigned");
            return Ok(ScanOutcome::UnknownTag);
        };

        let entry = AttendanceEntry::from_assignment(&assignment, now);
        self.seen.insert(tag_id.clone());
        self.entries.push(entry.clone());
        info!(tag_id = %tag_id, person = %entry.person_name, "Tap-in recorded");

        self.event_bus.emit(DeskEvent::AttendanceRecorded {
            owner_id: self.owner.clone(),
            entry: entry.clone(),
        });

        let notification = Notification {
            id: uuid_utils::generate(),
            message: Notification::tapped_in_message(&entry.person_name),
            timestamp: now,
            owner_id: self.owner.clone(),
        };
        match notifications::append_notification(&self.db, &notification).await {
            Ok(()) => {
                self.event_bus.emit(DeskEvent::NotificationLogged {
                    owner_id: self.owner.clone(),
                    notification,
                });
            }
            Err(e) => warn!(tag_id = %tag_id, "Failed to log tap-in notification: {}", e),
        }

        Ok(ScanOutcome::Recorded { entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tags;
    use eventdesk_common::db::open_in_memory;
    use eventdesk_common::models::TagAssignment;

    fn owner() -> OwnerId {
        OwnerId::parse("owner-1").unwrap()
    }

    async fn feed_with(assignments: &[(&str, &str, PersonType)]) -> AttendanceFeed {
        let pool = open_in_memory().await.unwrap();
        for (tag, name, person_type) in assignments {
            tags::upsert_assignment(
                &pool,
                &TagAssignment {
                    tag_id: TagId::parse(tag).unwrap(),
                    person_type: *person_type,
                    person_id: tag.to_string(),
                    person_name: name.to_string(),
                    person_email: String::new(),
                    person_phone: String::new(),
                    owner_id: owner(),
                },
            )
            .await
            .unwrap();
        }
        AttendanceFeed::new(owner(), pool, EventBus::new(16))
    }

    #[tokio::test]
    async fn test_second_scan_is_duplicate() {
        let mut feed = feed_with(&[("A1", "Sam", PersonType::Staff)]).await;

        assert!(matches!(
            feed.on_tag_scanned("A1").await.unwrap(),
            ScanOutcome::Recorded { .. }
        ));
        assert_eq!(feed.on_tag_scanned(" A1 ").await.unwrap(), ScanOutcome::Duplicate);

        assert_eq!(feed.entries().len(), 1);
        let logged = notifications::list_notifications(&feed.db, &owner()).await.unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].message, "Sam has tapped in.");
    }

    #[tokio::test]
    async fn test_unknown_and_blank_tags_are_discarded() {
        let mut feed = feed_with(&[]).await;

        assert_eq!(feed.on_tag_scanned("ZZ").await.unwrap(), ScanOutcome::UnknownTag);
        assert_eq!(feed.on_tag_scanned("   ").await.unwrap(), ScanOutcome::Ignored);
        assert!(feed.entries().is_empty());
        assert!(notifications::list_notifications(&feed.db, &owner())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_counts_follow_entries_in_arrival_order() {
        let mut feed = feed_with(&[
            ("A1", "Sam", PersonType::Staff),
            ("B2", "Jo", PersonType::Audience),
            ("C3", "Kim", PersonType::Audience),
        ])
        .await;

        for tag in ["C3", "A1", "B2"] {
            feed.on_tag_scanned(tag).await.unwrap();
        }

        let names: Vec<&str> = feed.entries().iter().map(|e| e.person_name.as_str()).collect();
        assert_eq!(names, vec!["Kim", "Sam", "Jo"]);
        assert_eq!(
            feed.counts(),
            AttendanceCounts {
                total_participants: 3,
                total_audience: 2,
                total_staff: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_staff_scanned_on_date() {
        let mut feed = feed_with(&[
            ("A1", "Sam", PersonType::Staff),
            ("B2", "Jo", PersonType::Audience),
        ])
        .await;
        let at = DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        feed.on_tag_scanned_at("A1", at).await.unwrap();
        feed.on_tag_scanned_at("B2", at).await.unwrap();

        let utc = time::fixed_offset(0).unwrap();
        assert_eq!(
            feed.staff_scanned_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), utc),
            1
        );
        assert_eq!(
            feed.staff_scanned_on(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), utc),
            0
        );
    }

    #[tokio::test]
    async fn test_failed_notification_keeps_entry() {
        let mut feed = feed_with(&[("A1", "Sam", PersonType::Staff)]).await;
        sqlx::query("DROP TABLE notifications")
            .execute(&feed.db)
            .await
            .unwrap();

        let outcome = feed.on_tag_scanned("A1").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Recorded { .. }));
        assert_eq!(feed.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_feed_unchanged() {
        let mut feed = feed_with(&[("A1", "Sam", PersonType::Staff)]).await;
        sqlx::query("DROP TABLE tag_assignments")
            .execute(&feed.db)
            .await
            .unwrap();

        assert!(feed.on_tag_scanned("A1").await.is_err());
        assert!(feed.entries().is_empty());
    }
}
