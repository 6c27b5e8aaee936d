//! Notification log persistence

use eventdesk_common::db::{parse_stored_owner, parse_stored_timestamp, to_stored_timestamp};
use eventdesk_common::models::Notification;
use eventdesk_common::{uuid_utils, OwnerId, Result};
use sqlx::{Row, SqlitePool};

pub async fn append_notification(pool: &SqlitePool, notification: &Notification) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, owner_id, message, timestamp)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(notification.id.to_string())
    .bind(notification.owner_id.as_str())
    .bind(&notification.message)
    .bind(to_stored_timestamp(&notification.timestamp))
    .execute(pool)
    .await?;

    Ok(())
}

/// Newest first
pub async fn list_notifications(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<Notification>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, message, timestamp
        FROM notifications
        WHERE owner_id = ?
        "#,
    )
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    let mut notifications = rows
        .iter()
        .map(|row| {
            let id: String = row.get("id");
            let owner: String = row.get("owner_id");
            let timestamp: String = row.get("timestamp");
            Ok(Notification {
                id: uuid_utils::parse_stored(&id)?,
                message: row.get("message"),
                timestamp: parse_stored_timestamp(&timestamp)?,
                owner_id: parse_stored_owner(&owner)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(notifications)
}

/// Remove every notification of the owner, returning how many went
pub async fn clear_notifications(pool: &SqlitePool, owner: &OwnerId) -> Result<u64> {
    let result = sqlx::query("DELETE FROM notifications WHERE owner_id = ?")
        .bind(owner.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
