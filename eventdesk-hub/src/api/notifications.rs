//! Notification log endpoints

use axum::{extract::State, routing::get, Json, Router};
use eventdesk_common::models::Notification;
use serde::Serialize;

use crate::api::auth::CurrentOwner;
use crate::db::notifications;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub removed: u64,
}

/// GET /api/notifications (newest first)
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(notifications::list_notifications(&state.db, &owner).await?))
}

/// DELETE /api/notifications
pub async fn clear_notifications(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<ClearedResponse>> {
    let removed = notifications::clear_notifications(&state.db, &owner).await?;
    Ok(Json(ClearedResponse { removed }))
}

pub fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/api/notifications",
        get(list_notifications).delete(clear_notifications),
    )
}
