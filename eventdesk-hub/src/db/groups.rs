//! Event group persistence

use eventdesk_common::models::{EventGroup, NewEventGroup};
use eventdesk_common::db::parse_stored_owner;
use eventdesk_common::{uuid_utils, OwnerId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn group_from_row(row: &SqliteRow) -> Result<EventGroup> {
    let id: String = row.get("id");
    let owner: String = row.get("owner_id");

    Ok(EventGroup {
        id: uuid_utils::parse_stored(&id)?,
        name: row.get("name"),
        budget: row.get("budget"),
        owner_id: parse_stored_owner(&owner)?,
    })
}

/// Insert a new group, returning the stored record
pub async fn insert_group(
    pool: &SqlitePool,
    owner: &OwnerId,
    draft: &NewEventGroup,
) -> Result<EventGroup> {
    draft.validate()?;
    let group = EventGroup {
        id: uuid_utils::generate(),
        name: draft.name.trim().to_string(),
        budget: draft.budget,
        owner_id: owner.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO event_groups (id, owner_id, name, budget, created_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(group.id.to_string())
    .bind(owner.as_str())
    .bind(&group.name)
    .bind(group.budget)
    .execute(pool)
    .await?;

    Ok(group)
}

/// All groups of the owner, by name
pub async fn list_groups(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<EventGroup>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, budget
        FROM event_groups
        WHERE owner_id = ?
        ORDER BY name COLLATE NOCASE, created_at
        "#,
    )
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(group_from_row).collect()
}

pub async fn load_group(
    pool: &SqlitePool,
    owner: &OwnerId,
    id: Uuid,
) -> Result<Option<EventGroup>> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, name, budget
        FROM event_groups
        WHERE owner_id = ? AND id = ?
        "#,
    )
    .bind(owner.as_str())
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(group_from_row).transpose()
}

/// Delete a group; expenses referencing it are left in place
///
/// Returns true when a row was removed.
pub async fn delete_group(pool: &SqlitePool, owner: &OwnerId, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM event_groups WHERE owner_id = ? AND id = ?")
        .bind(owner.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
