//! Shift (rota entry) persistence

use chrono::{DateTime, Utc};
use eventdesk_common::db::{parse_stored_owner, parse_stored_timestamp, to_stored_timestamp};
use eventdesk_common::models::Shift;
use eventdesk_common::{uuid_utils, OwnerId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SHIFT_COLUMNS: &str = "id, owner_id, event_id, staff_id, start_at, end_at";

fn shift_from_row(row: &SqliteRow) -> Result<Shift> {
    let id: String = row.get("id");
    let event_id: String = row.get("event_id");
    let staff_id: String = row.get("staff_id");
    let start: String = row.get("start_at");
    let end: String = row.get("end_at");
    let owner: String = row.get("owner_id");

    Ok(Shift {
        id: uuid_utils::parse_stored(&id)?,
        event_id: uuid_utils::parse_stored(&event_id)?,
        staff_id: uuid_utils::parse_stored(&staff_id)?,
        start: parse_stored_timestamp(&start)?,
        end: parse_stored_timestamp(&end)?,
        owner_id: parse_stored_owner(&owner)?,
    })
}

pub async fn insert_shift(pool: &SqlitePool, shift: &Shift) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shifts (id, owner_id, event_id, staff_id, start_at, end_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(shift.id.to_string())
    .bind(shift.owner_id.as_str())
    .bind(shift.event_id.to_string())
    .bind(shift.staff_id.to_string())
    .bind(to_stored_timestamp(&shift.start))
    .bind(to_stored_timestamp(&shift.end))
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite an existing shift (last write wins)
///
/// Returns false when the owner has no shift with that id.
pub async fn update_shift(pool: &SqlitePool, shift: &Shift) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE shifts
        SET event_id = ?, staff_id = ?, start_at = ?, end_at = ?, updated_at = CURRENT_TIMESTAMP
        WHERE owner_id = ? AND id = ?
        "#,
    )
    .bind(shift.event_id.to_string())
    .bind(shift.staff_id.to_string())
    .bind(to_stored_timestamp(&shift.start))
    .bind(to_stored_timestamp(&shift.end))
    .bind(shift.owner_id.as_str())
    .bind(shift.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// All shifts of the owner, in no particular order
pub async fn list_shifts(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<Shift>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM shifts WHERE owner_id = ?",
        SHIFT_COLUMNS
    ))
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(shift_from_row).collect()
}

pub async fn list_staff_shifts(
    pool: &SqlitePool,
    owner: &OwnerId,
    staff_id: Uuid,
) -> Result<Vec<Shift>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM shifts WHERE owner_id = ? AND staff_id = ?",
        SHIFT_COLUMNS
    ))
    .bind(owner.as_str())
    .bind(staff_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(shift_from_row).collect()
}

/// Shifts lying entirely inside `[from, to)`
pub async fn list_shifts_within(
    pool: &SqlitePool,
    owner: &OwnerId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Shift>> {
    // Stored text is not comparable across offsets, so filter after parsing.
    let shifts = list_shifts(pool, owner).await?;
    Ok(shifts
        .into_iter()
        .filter(|s| s.start >= from && s.end <= to)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_common::db::open_in_memory;
    use eventdesk_common::Error;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn shift(owner: &OwnerId, staff_id: Uuid, start: &str, end: &str) -> Shift {
        Shift {
            id: uuid_utils::generate(),
            event_id: Uuid::new_v4(),
            staff_id,
            start: at(start),
            end: at(end),
            owner_id: owner.clone(),
        }
    }

    #[tokio::test]
    async fn test_insert_update_and_list() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let staff = Uuid::new_v4();
        let mut first = shift(&alice, staff, "2024-06-01T09:00:00Z", "2024-06-01T12:00:00Z");
        insert_shift(&pool, &first).await.unwrap();

        first.end = at("2024-06-01T14:00:00Z");
        assert!(update_shift(&pool, &first).await.unwrap());

        let listed = list_shifts(&pool, &alice).await.unwrap();
        assert_eq!(listed, vec![first.clone()]);
        assert_eq!(list_staff_shifts(&pool, &alice, staff).await.unwrap().len(), 1);
        assert!(list_staff_shifts(&pool, &alice, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_shift_reports_false() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let ghost = shift(&alice, Uuid::new_v4(), "2024-06-01T09:00:00Z", "2024-06-01T12:00:00Z");
        assert!(!update_shift(&pool, &ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_within_requires_full_containment() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let staff = Uuid::new_v4();
        insert_shift(&pool, &shift(&alice, staff, "2024-06-01T09:00:00Z", "2024-06-01T17:00:00Z"))
            .await
            .unwrap();
        insert_shift(&pool, &shift(&alice, staff, "2024-06-01T22:00:00Z", "2024-06-02T02:00:00Z"))
            .await
            .unwrap();

        let inside = list_shifts_within(
            &pool,
            &alice,
            at("2024-06-01T00:00:00Z"),
            at("2024-06-02T00:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(inside.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_invalid_record() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        insert_shift(&pool, &shift(&alice, Uuid::new_v4(), "2024-06-01T09:00:00Z", "2024-06-01T12:00:00Z"))
            .await
            .unwrap();
        sqlx::query("UPDATE shifts SET start_at = 'noon'")
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            list_shifts(&pool, &alice).await,
            Err(Error::InvalidRecord(_))
        ));
    }
}
