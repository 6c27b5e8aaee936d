//! Tag registry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use eventdesk_common::events::DeskEvent;
use eventdesk_common::models::{TagAssignment, TagId};
use eventdesk_common::{time, Error};
use serde::Deserialize;

use crate::api::auth::CurrentOwner;
use crate::error::ApiResult;
use crate::services::tag_registry::{self, TagBinding};
use crate::AppState;

/// Body of POST /api/tags
#[derive(Debug, Deserialize)]
pub struct AssignTagRequest {
    pub tag_id: String,
    #[serde(flatten)]
    pub binding: TagBinding,
}

fn announce_assigned(state: &AppState, assignment: &TagAssignment) {
    state.event_bus.emit(DeskEvent::TagAssigned {
        owner_id: assignment.owner_id.clone(),
        tag_id: assignment.tag_id.clone(),
        timestamp: time::now(),
    });
}

/// GET /api/tags
pub async fn list_tags(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<Vec<TagAssignment>>> {
    Ok(Json(tag_registry::list_tags(&state.db, &owner).await?))
}

/// POST /api/tags
pub async fn assign_tag(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<AssignTagRequest>,
) -> ApiResult<Json<TagAssignment>> {
    let assignment =
        tag_registry::assign_tag(&state.db, &owner, &request.tag_id, &request.binding).await?;
    announce_assigned(&state, &assignment);
    Ok(Json(assignment))
}

/// POST /api/tags/scan-assign
///
/// Reads the tag currently on the reader and binds it.
pub async fn scan_assign(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(binding): Json<TagBinding>,
) -> ApiResult<Json<TagAssignment>> {
    let assignment =
        tag_registry::scan_and_assign(&state.db, state.bridge.as_ref(), &owner, &binding).await?;
    announce_assigned(&state, &assignment);
    Ok(Json(assignment))
}

/// GET /api/tags/:tag_id
pub async fn get_tag(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(raw_tag_id): Path<String>,
) -> ApiResult<Json<TagAssignment>> {
    let tag_id = TagId::parse(&raw_tag_id)?;
    let assignment = tag_registry::lookup_tag(&state.db, &owner, &tag_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("tag {}", tag_id)))?;
    Ok(Json(assignment))
}

/// DELETE /api/tags/:tag_id
///
/// Succeeds whether or not the tag was assigned.
pub async fn unassign_tag(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(raw_tag_id): Path<String>,
) -> ApiResult<StatusCode> {
    let tag_id = TagId::parse(&raw_tag_id)?;
    tag_registry::unassign_tag(&state.db, &owner, tag_id.as_str()).await?;
    state.event_bus.emit(DeskEvent::TagUnassigned {
        owner_id: owner,
        tag_id,
        timestamp: time::now(),
    });
    Ok(StatusCode::NO_CONTENT)
}

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tags", get(list_tags).post(assign_tag))
        .route("/api/tags/scan-assign", post(scan_assign))
        .route("/api/tags/:tag_id", get(get_tag).delete(unassign_tag))
}
