//! Team roster

use crate::db::team;
use eventdesk_common::models::{MemberDraft, TeamMember};
use eventdesk_common::{uuid_utils, Error, OwnerId, Result};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

fn member_from_draft(id: Uuid, owner: &OwnerId, draft: &MemberDraft) -> Result<TeamMember> {
    let access = draft.validate()?;
    Ok(TeamMember {
        id,
        name: draft.name.trim().to_string(),
        age: draft.age,
        phone: draft.phone.trim().to_string(),
        email: draft.email.trim().to_string(),
        access,
        position: draft.position.trim().to_string(),
        owner_id: owner.clone(),
    })
}

pub async fn add_member(
    pool: &SqlitePool,
    owner: &OwnerId,
    draft: &MemberDraft,
) -> Result<TeamMember> {
    let member = member_from_draft(uuid_utils::generate(), owner, draft)?;
    team::insert_member(pool, &member).await?;
    info!(member_id = %member.id, name = %member.name, "Added team member");
    Ok(member)
}

pub async fn update_member(
    pool: &SqlitePool,
    owner: &OwnerId,
    id: Uuid,
    draft: &MemberDraft,
) -> Result<TeamMember> {
    let member = member_from_draft(id, owner, draft)?;
    if !team::update_member(pool, &member).await? {
        return Err(Error::NotFound(format!("team member {}", id)));
    }
    Ok(member)
}

/// Shifts and tags referencing the member are left in place
pub async fn remove_member(pool: &SqlitePool, owner: &OwnerId, id: Uuid) -> Result<()> {
    if !team::delete_member(pool, owner, id).await? {
        return Err(Error::NotFound(format!("team member {}", id)));
    }
    info!(member_id = %id, "Removed team member");
    Ok(())
}

/// Members matching `search` (all members when absent or blank)
pub async fn search_members(
    pool: &SqlitePool,
    owner: &OwnerId,
    search: Option<&str>,
) -> Result<Vec<TeamMember>> {
    let members = team::list_members(pool, owner).await?;
    Ok(match search {
        Some(needle) => members.into_iter().filter(|m| m.matches(needle)).collect(),
        None => members,
    })
}
