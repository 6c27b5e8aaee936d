//! Tag registry
//!
//! One assignment per physical tag. Assigning a tag that is already bound
//! replaces the previous binding.

use crate::db::{tags, team};
use crate::services::device_bridge::DeviceBridge;
use eventdesk_common::models::{PersonType, TagAssignment, TagId};
use eventdesk_common::{Error, OwnerId, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Who a tag should be bound to
///
/// Staff bindings reference a team member; audience bindings carry the
/// entrant's details inline.
#[derive(Debug, Clone, Deserialize)]
pub struct TagBinding {
    pub person_type: String,
    #[serde(default)]
    pub person_id: Option<Uuid>,
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default)]
    pub person_email: Option<String>,
    #[serde(default)]
    pub person_phone: Option<String>,
}

/// Bind a tag to a person, replacing any previous binding of the tag
pub async fn assign_tag(
    pool: &SqlitePool,
    owner: &OwnerId,
    raw_tag_id: &str,
    binding: &TagBinding,
) -> Result<TagAssignment> {
    let tag_id = TagId::parse(raw_tag_id)?;
    let person_type: PersonType = binding.person_type.parse()?;

    let assignment = match person_type {
        PersonType::Staff => {
            let member_id = binding.person_id.ok_or_else(|| {
                Error::Validation("person_id is required for staff tags".to_string())
            })?;
            let member = team::load_member(pool, owner, member_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("team member {}", member_id)))?;

            TagAssignment {
                person_id: member.id.to_string(),
                person_name: member.name,
                person_email: member.email,
                person_phone: member.phone,
                tag_id,
                person_type,
                owner_id: owner.clone(),
            }
        }
        PersonType::Audience => {
            let name = binding
                .person_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    Error::Validation("person_name is required for audience tags".to_string())
                })?;

            TagAssignment {
                person_id: tag_id.as_str().to_string(),
                person_name: name.to_string(),
                person_email: binding.person_email.clone().unwrap_or_default(),
                person_phone: binding.person_phone.clone().unwrap_or_default(),
                tag_id,
                person_type,
                owner_id: owner.clone(),
            }
        }
    };

    tags::upsert_assignment(pool, &assignment).await?;
    info!(
        tag_id = %assignment.tag_id,
        person_type = %assignment.person_type,
        person = %assignment.person_name,
        "Assigned tag"
    );

    Ok(assignment)
}

/// Remove the owner's binding for a tag; unknown tags are not an error
pub async fn unassign_tag(pool: &SqlitePool, owner: &OwnerId, raw_tag_id: &str) -> Result<()> {
    let tag_id = TagId::parse(raw_tag_id)?;
    if tags::delete_assignment(pool, owner, &tag_id).await? {
        info!(tag_id = %tag_id, "Unassigned tag");
    }
    Ok(())
}

/// A miss is a normal outcome
pub async fn lookup_tag(
    pool: &SqlitePool,
    owner: &OwnerId,
    tag_id: &TagId,
) -> Result<Option<TagAssignment>> {
    tags::load_assignment(pool, owner, tag_id).await
}

pub async fn list_tags(pool: &SqlitePool, owner: &OwnerId) -> Result<Vec<TagAssignment>> {
    tags::list_assignments(pool, owner).await
}

/// Read whatever tag is on the reader and bind it in one step
pub async fn scan_and_assign(
    pool: &SqlitePool,
    bridge: &dyn DeviceBridge,
    owner: &OwnerId,
    binding: &TagBinding,
) -> Result<TagAssignment> {
    let tag_id = bridge
        .scan_tag()
        .await?
        .ok_or_else(|| Error::DeviceUnavailable("no tag on the reader".to_string()))?;

    assign_tag(pool, owner, tag_id.as_str(), binding).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_common::db::open_in_memory;
    use eventdesk_common::models::{AccessLevel, TeamMember};

    fn owner() -> OwnerId {
        OwnerId::parse("owner-1").unwrap()
    }

    fn audience(name: &str, email: &str) -> TagBinding {
        TagBinding {
            person_type: "audience".to_string(),
            person_id: None,
            person_name: Some(name.to_string()),
            person_email: Some(email.to_string()),
            person_phone: None,
        }
    }

    async fn add_member(pool: &SqlitePool, name: &str) -> TeamMember {
        let member = TeamMember {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age: 28,
            phone: "555-0101".to_string(),
            email: "sam@example.com".to_string(),
            access: AccessLevel::User,
            position: "Security".to_string(),
            owner_id: owner(),
        };
        team::insert_member(pool, &member).await.unwrap();
        member
    }

    #[tokio::test]
    async fn test_audience_assignment_and_lookup() {
        let pool = open_in_memory().await.unwrap();
        assign_tag(&pool, &owner(), "B2", &audience("Jo", "jo@x.com"))
            .await
            .unwrap();

        let found = lookup_tag(&pool, &owner(), &TagId::parse("B2").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.person_type, PersonType::Audience);
        assert_eq!(found.person_name, "Jo");
        assert_eq!(found.person_id, "B2");
    }

    #[tokio::test]
    async fn test_second_assignment_overwrites_first() {
        let pool = open_in_memory().await.unwrap();
        let sam = add_member(&pool, "Sam").await;

        assign_tag(&pool, &owner(), "A1", &audience("Jo", "jo@x.com"))
            .await
            .unwrap();
        let second = assign_tag(
            &pool,
            &owner(),
            "A1",
            &TagBinding {
                person_type: "staff".to_string(),
                person_id: Some(sam.id),
                person_name: None,
                person_email: None,
                person_phone: None,
            },
        )
        .await
        .unwrap();

        let all = list_tags(&pool, &owner()).await.unwrap();
        assert_eq!(all, vec![second]);
        assert_eq!(all[0].person_name, "Sam");
        assert_eq!(all[0].person_email, "sam@example.com");
        assert_eq!(all[0].person_id, sam.id.to_string());
    }

    #[tokio::test]
    async fn test_staff_binding_requires_existing_member() {
        let pool = open_in_memory().await.unwrap();
        let binding = TagBinding {
            person_type: "staff".to_string(),
            person_id: Some(Uuid::new_v4()),
            person_name: None,
            person_email: None,
            person_phone: None,
        };

        let result = assign_tag(&pool, &owner(), "A1", &binding).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(list_tags(&pool, &owner()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_person_type_rejected() {
        let pool = open_in_memory().await.unwrap();
        let mut binding = audience("Jo", "");
        binding.person_type = "vip".to_string();

        let result = assign_tag(&pool, &owner(), "A1", &binding).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_unassign_then_lookup_misses() {
        let pool = open_in_memory().await.unwrap();
        let tag = TagId::parse("C3").unwrap();
        assign_tag(&pool, &owner(), "C3", &audience("Jo", ""))
            .await
            .unwrap();

        unassign_tag(&pool, &owner(), "C3").await.unwrap();
        assert!(lookup_tag(&pool, &owner(), &tag).await.unwrap().is_none());

        unassign_tag(&pool, &owner(), "never-assigned").await.unwrap();
    }
}
