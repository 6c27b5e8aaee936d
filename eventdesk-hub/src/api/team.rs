//! Team roster endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use eventdesk_common::models::{MemberDraft, TeamMember};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::auth::CurrentOwner;
use crate::error::ApiResult;
use crate::services::roster;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// GET /api/team
pub async fn list_team(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let members = roster::search_members(&state.db, &owner, query.search.as_deref()).await?;
    Ok(Json(members))
}

/// POST /api/team
pub async fn create_member(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(draft): Json<MemberDraft>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = roster::add_member(&state.db, &owner, &draft).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/team/:id
pub async fn update_member(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
    Json(draft): Json<MemberDraft>,
) -> ApiResult<Json<TeamMember>> {
    Ok(Json(roster::update_member(&state.db, &owner, id, &draft).await?))
}

/// DELETE /api/team/:id
pub async fn delete_member(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    roster::remove_member(&state.db, &owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/api/team", get(list_team).post(create_member))
        .route("/api/team/:id", put(update_member).delete(delete_member))
}
