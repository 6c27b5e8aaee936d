//! Shift ledger
//!
//! Stores staff-to-event assignments and renders them per calendar day.
//! Double-booking a staff member is allowed; the overlapping shifts are
//! reported back to the caller and logged.

use crate::db::{groups, shifts, team};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use eventdesk_common::models::{EventGroup, Shift, ShiftDraft, TeamMember, UNKNOWN_NAME};
use eventdesk_common::{time, uuid_utils, Error, OwnerId, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of a shift write
#[derive(Debug, Clone, Serialize)]
pub struct SavedShift {
    pub shift: Shift,
    /// Other shifts of the same staff member whose windows intersect this one
    pub overlapping: Vec<Shift>,
}

/// Create a shift, or overwrite it when the draft carries an id
pub async fn create_or_update_shift(
    pool: &SqlitePool,
    owner: &OwnerId,
    draft: &ShiftDraft,
) -> Result<SavedShift> {
    draft.validate()?;

    let shift = Shift {
        id: draft.id.unwrap_or_else(uuid_utils::generate),
        event_id: draft.event_id,
        staff_id: draft.staff_id,
        start: draft.start,
        end: draft.end,
        owner_id: owner.clone(),
    };

    if draft.id.is_some() {
        if !shifts::update_shift(pool, &shift).await? {
            return Err(Error::NotFound(format!("shift {}", shift.id)));
        }
        info!(shift_id = %shift.id, staff_id = %shift.staff_id, "Updated shift");
    } else {
        shifts::insert_shift(pool, &shift).await?;
        info!(shift_id = %shift.id, staff_id = %shift.staff_id, "Created shift");
    }

    let overlapping: Vec<Shift> = shifts::list_staff_shifts(pool, owner, shift.staff_id)
        .await?
        .into_iter()
        .filter(|other| other.id != shift.id && other.overlaps(shift.start, shift.end))
        .collect();

    if !overlapping.is_empty() {
        warn!(
            shift_id = %shift.id,
            staff_id = %shift.staff_id,
            overlapping = overlapping.len(),
            "Staff member is double-booked"
        );
    }

    Ok(SavedShift { shift, overlapping })
}

pub async fn list_shifts(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<Shift>> {
    shifts::list_shifts(pool, owner).await
}

/// Shifts grouped by the local calendar date of their start
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket<T> {
    pub date: NaiveDate,
    pub items: Vec<T>,
}

/// Group shifts by local start date, days ascending, shifts by start within a day
pub fn group_by_day(shifts: Vec<Shift>, offset: FixedOffset) -> Vec<DayBucket<Shift>> {
    let mut days: BTreeMap<NaiveDate, Vec<Shift>> = BTreeMap::new();
    for shift in shifts {
        days.entry(time::local_date(shift.start, offset))
            .or_default()
            .push(shift);
    }

    days.into_iter()
        .map(|(date, mut items)| {
            items.sort_by_key(|s| s.start);
            DayBucket { date, items }
        })
        .collect()
}

/// Id to name lookup; misses read as "Unknown"
#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    names: HashMap<Uuid, String>,
}

impl NameDirectory {
    pub fn from_members(members: &[TeamMember]) -> Self {
        Self {
            names: members.iter().map(|m| (m.id, m.name.clone())).collect(),
        }
    }

    pub fn from_groups(groups: &[EventGroup]) -> Self {
        Self {
            names: groups.iter().map(|g| (g.id, g.name.clone())).collect(),
        }
    }

    pub fn name_of(&self, id: &Uuid) -> &str {
        self.names.get(id).map(String::as_str).unwrap_or(UNKNOWN_NAME)
    }
}

/// `"<staff> - <event>"`
pub fn resolve_display_name(
    shift: &Shift,
    staff_directory: &NameDirectory,
    event_directory: &NameDirectory,
) -> String {
    format!(
        "{} - {}",
        staff_directory.name_of(&shift.staff_id),
        event_directory.name_of(&shift.event_id)
    )
}

/// One shift as rendered in the rota view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotaEntry {
    pub shift: Shift,
    pub staff_name: String,
    pub event_name: String,
    pub title: String,
    pub summary: String,
}

pub fn describe_shift(
    shift: Shift,
    staff_directory: &NameDirectory,
    event_directory: &NameDirectory,
    offset: FixedOffset,
) -> RotaEntry {
    let staff_name = staff_directory.name_of(&shift.staff_id).to_string();
    let event_name = event_directory.name_of(&shift.event_id).to_string();
    let title = resolve_display_name(&shift, staff_directory, event_directory);
    let summary = format!(
        "Staff: {} is appointed for {} to {} for {}.",
        staff_name,
        time::format_clock(shift.start, offset),
        time::format_clock(shift.end, offset),
        event_name
    );

    RotaEntry {
        shift,
        staff_name,
        event_name,
        title,
        summary,
    }
}

/// The owner's rota, one bucket per local day
pub async fn rota_by_day(
    pool: &SqlitePool,
    owner: &OwnerId,
    offset: FixedOffset,
) -> Result<Vec<DayBucket<RotaEntry>>> {
    let all = shifts::list_shifts(pool, owner).await?;
    let staff = NameDirectory::from_members(&team::list_members(pool, owner).await?);
    let events = NameDirectory::from_groups(&groups::list_groups(pool, owner).await?);

    Ok(group_by_day(all, offset)
        .into_iter()
        .map(|day| DayBucket {
            date: day.date,
            items: day
                .items
                .into_iter()
                .map(|shift| describe_shift(shift, &staff, &events, offset))
                .collect(),
        })
        .collect())
}

/// Shifts that start and end within the local day containing `now`
pub async fn expected_staff_today(
    pool: &SqlitePool,
    owner: &OwnerId,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<usize> {
    let (from, to) = time::day_bounds(time::local_date(now, offset), offset);
    Ok(shifts::list_shifts_within(pool, owner, from, to).await?.len())
}
