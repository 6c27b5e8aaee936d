//! Team member persistence

use eventdesk_common::db::{parse_stored_field, parse_stored_owner};
use eventdesk_common::models::TeamMember;
use eventdesk_common::{uuid_utils, Error, OwnerId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn member_from_row(row: &SqliteRow) -> Result<TeamMember> {
    let id: String = row.get("id");
    let access: String = row.get("access");
    let owner: String = row.get("owner_id");
    let age: i64 = row.get("age");

    Ok(TeamMember {
        id: uuid_utils::parse_stored(&id)?,
        name: row.get("name"),
        age: u32::try_from(age)
            .map_err(|_| Error::InvalidRecord(format!("bad age {} for member {}", age, id)))?,
        phone: row.get("phone"),
        email: row.get("email"),
        access: parse_stored_field("access", &access)?,
        position: row.get("position"),
        owner_id: parse_stored_owner(&owner)?,
    })
}

pub async fn insert_member(pool: &SqlitePool, member: &TeamMember) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO team_members (
            id, owner_id, name, age, phone, email, access, position,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(member.id.to_string())
    .bind(member.owner_id.as_str())
    .bind(&member.name)
    .bind(i64::from(member.age))
    .bind(&member.phone)
    .bind(&member.email)
    .bind(member.access.as_str())
    .bind(&member.position)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite an existing member's fields
///
/// Returns false when the owner has no member with that id.
pub async fn update_member(pool: &SqlitePool, member: &TeamMember) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE team_members
        SET name = ?, age = ?, phone = ?, email = ?, access = ?, position = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE owner_id = ? AND id = ?
        "#,
    )
    .bind(&member.name)
    .bind(i64::from(member.age))
    .bind(&member.phone)
    .bind(&member.email)
    .bind(member.access.as_str())
    .bind(&member.position)
    .bind(member.owner_id.as_str())
    .bind(member.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_members(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<TeamMember>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, age, phone, email, access, position
        FROM team_members
        WHERE owner_id = ?
        ORDER BY name COLLATE NOCASE, created_at
        "#,
    )
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(member_from_row).collect()
}

pub async fn load_member(
    pool: &SqlitePool,
    owner: &OwnerId,
    id: Uuid,
) -> Result<Option<TeamMember>> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, name, age, phone, email, access, position
        FROM team_members
        WHERE owner_id = ? AND id = ?
        "#,
    )
    .bind(owner.as_str())
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(member_from_row).transpose()
}

pub async fn delete_member(pool: &SqlitePool, owner: &OwnerId, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM team_members WHERE owner_id = ? AND id = ?")
        .bind(owner.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_common::db::open_in_memory;
    use eventdesk_common::models::AccessLevel;

    fn member(owner: &OwnerId, name: &str) -> TeamMember {
        TeamMember {
            id: uuid_utils::generate(),
            name: name.to_string(),
            age: 30,
            phone: "555-0100".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            access: AccessLevel::User,
            position: "Bartenders".to_string(),
            owner_id: owner.clone(),
        }
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let mut sam = member(&alice, "Sam");
        insert_member(&pool, &sam).await.unwrap();

        sam.access = AccessLevel::Manager;
        sam.position = "Security".to_string();
        assert!(update_member(&pool, &sam).await.unwrap());

        let loaded = load_member(&pool, &alice, sam.id).await.unwrap().unwrap();
        assert_eq!(loaded, sam);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_member() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let bob = OwnerId::parse("bob").unwrap();
        let sam = member(&alice, "Sam");
        insert_member(&pool, &sam).await.unwrap();

        let mut hijack = sam.clone();
        hijack.owner_id = bob.clone();
        assert!(!update_member(&pool, &hijack).await.unwrap());
        assert!(load_member(&pool, &bob, sam.id).await.unwrap().is_none());
        assert!(!delete_member(&pool, &bob, sam.id).await.unwrap());
        assert_eq!(list_members(&pool, &alice).await.unwrap(), vec![sam]);
    }
}
