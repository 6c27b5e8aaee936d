//! Tag assignment persistence
//!
//! The table is keyed by the tag id itself, so a second assignment of the
//! same tag replaces the first.

use eventdesk_common::db::{parse_stored_field, parse_stored_owner};
use eventdesk_common::models::{TagAssignment, TagId};
use eventdesk_common::{Error, OwnerId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn assignment_from_row(row: &SqliteRow) -> Result<TagAssignment> {
    let tag_id: String = row.get("tag_id");
    let person_type: String = row.get("person_type");
    let owner: String = row.get("owner_id");

    Ok(TagAssignment {
        tag_id: TagId::normalize(&tag_id)
            .ok_or_else(|| Error::InvalidRecord("tag assignment with blank tag id".to_string()))?,
        person_type: parse_stored_field("person_type", &person_type)?,
        person_id: row.get("person_id"),
        person_name: row.get("person_name"),
        person_email: row.get("person_email"),
        person_phone: row.get("person_phone"),
        owner_id: parse_stored_owner(&owner)?,
    })
}

/// Insert or replace the assignment for a tag
pub async fn upsert_assignment(pool: &SqlitePool, assignment: &TagAssignment) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tag_assignments (
            tag_id, owner_id, person_type, person_id, person_name,
            person_email, person_phone, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(tag_id) DO UPDATE SET
            owner_id = excluded.owner_id,
            person_type = excluded.person_type,
            person_id = excluded.person_id,
            person_name = excluded.person_name,
            person_email = excluded.person_email,
            person_phone = excluded.person_phone,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(assignment.tag_id.as_str())
    .bind(assignment.owner_id.as_str())
    .bind(assignment.person_type.as_str())
    .bind(&assignment.person_id)
    .bind(&assignment.person_name)
    .bind(&assignment.person_email)
    .bind(&assignment.person_phone)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_assignment(
    pool: &SqlitePool,
    owner: &OwnerId,
    tag_id: &TagId,
) -> Result<Option<TagAssignment>> {
    let row = sqlx::query(
        r#"
        SELECT tag_id, owner_id, person_type, person_id, person_name, person_email, person_phone
        FROM tag_assignments
        WHERE owner_id = ? AND tag_id = ?
        "#,
    )
    .bind(owner.as_str())
    .bind(tag_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(assignment_from_row).transpose()
}

/// All assignments of the owner, by person name
pub async fn list_assignments(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<TagAssignment>> {
    let rows = sqlx::query(
        r#"
        SELECT tag_id, owner_id, person_type, person_id, person_name, person_email, person_phone
        FROM tag_assignments
        WHERE owner_id = ?
        ORDER BY person_name COLLATE NOCASE, tag_id
        "#,
    )
    .bind(owner.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(assignment_from_row).collect()
}

/// Returns true when a row was removed
pub async fn delete_assignment(pool: &SqlitePool, owner: &OwnerId, tag_id: &TagId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tag_assignments WHERE owner_id = ? AND tag_id = ?")
        .bind(owner.as_str())
        .bind(tag_id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_common::db::open_in_memory;
    use eventdesk_common::models::PersonType;

    fn audience(owner: &OwnerId, tag: &str, name: &str) -> TagAssignment {
        TagAssignment {
            tag_id: TagId::parse(tag).unwrap(),
            person_type: PersonType::Audience,
            person_id: tag.to_string(),
            person_name: name.to_string(),
            person_email: String::new(),
            person_phone: String::new(),
            owner_id: owner.clone(),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_tag() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();

        upsert_assignment(&pool, &audience(&alice, "B2", "Jo")).await.unwrap();
        upsert_assignment(&pool, &audience(&alice, "B2", "Kim")).await.unwrap();

        let listed = list_assignments(&pool, &alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].person_name, "Kim");
    }

    #[tokio::test]
    async fn test_list_sorted_by_person_name() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        upsert_assignment(&pool, &audience(&alice, "T1", "zoe")).await.unwrap();
        upsert_assignment(&pool, &audience(&alice, "T2", "Adam")).await.unwrap();

        let names: Vec<String> = list_assignments(&pool, &alice)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.person_name)
            .collect();
        assert_eq!(names, vec!["Adam", "zoe"]);
    }

    #[tokio::test]
    async fn test_delete_and_load_are_owner_scoped() {
        let pool = open_in_memory().await.unwrap();
        let alice = OwnerId::parse("alice").unwrap();
        let bob = OwnerId::parse("bob").unwrap();
        let tag = TagId::parse("C3").unwrap();
        upsert_assignment(&pool, &audience(&alice, "C3", "Jo")).await.unwrap();

        assert!(load_assignment(&pool, &bob, &tag).await.unwrap().is_none());
        assert!(!delete_assignment(&pool, &bob, &tag).await.unwrap());
        assert!(load_assignment(&pool, &alice, &tag).await.unwrap().is_some());
        assert!(delete_assignment(&pool, &alice, &tag).await.unwrap());
        assert!(load_assignment(&pool, &alice, &tag).await.unwrap().is_none());
    }
}
