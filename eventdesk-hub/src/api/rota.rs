//! Shift ledger endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use eventdesk_common::events::DeskEvent;
use eventdesk_common::models::{Shift, ShiftDraft};
use eventdesk_common::time;
use uuid::Uuid;

use crate::api::auth::CurrentOwner;
use crate::error::{ApiError, ApiResult};
use crate::services::shift_ledger::{self, DayBucket, RotaEntry, SavedShift};
use crate::AppState;

fn announce(state: &AppState, saved: &SavedShift) {
    state.event_bus.emit(DeskEvent::ShiftSaved {
        owner_id: saved.shift.owner_id.clone(),
        shift_id: saved.shift.id,
        overlapping: saved.overlapping.len(),
        timestamp: time::now(),
    });
}

/// GET /api/shifts
pub async fn list_shifts(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<Vec<Shift>>> {
    Ok(Json(shift_ledger::list_shifts(&state.db, &owner).await?))
}

/// POST /api/shifts
pub async fn create_shift(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(draft): Json<ShiftDraft>,
) -> ApiResult<(StatusCode, Json<SavedShift>)> {
    let saved = shift_ledger::create_or_update_shift(&state.db, &owner, &draft).await?;
    announce(&state, &saved);
    let status = if draft.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(saved)))
}

/// PUT /api/shifts/:id
pub async fn update_shift(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
    Json(mut draft): Json<ShiftDraft>,
) -> ApiResult<Json<SavedShift>> {
    if draft.id.is_some_and(|body_id| body_id != id) {
        return Err(ApiError::BadRequest(
            "shift id in body does not match path".to_string(),
        ));
    }
    draft.id = Some(id);

    let saved = shift_ledger::create_or_update_shift(&state.db, &owner, &draft).await?;
    announce(&state, &saved);
    Ok(Json(saved))
}

/// GET /api/shifts/by-day
pub async fn shifts_by_day(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<Vec<DayBucket<RotaEntry>>>> {
    let days = shift_ledger::rota_by_day(&state.db, &owner, state.settings.utc_offset).await?;
    Ok(Json(days))
}

pub fn rota_routes() -> Router<AppState> {
    Router::new()
        .route("/api/shifts", get(list_shifts).post(create_shift))
        .route("/api/shifts/by-day", get(shifts_by_day))
        .route("/api/shifts/:id", put(update_shift))
}
