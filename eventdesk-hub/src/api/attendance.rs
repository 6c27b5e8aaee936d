//! Attendance feed and scan session endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::auth::CurrentOwner;
use crate::error::ApiResult;
use crate::services::{ScanOutcome, SessionStatus};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ManualScanRequest {
    pub tag_id: String,
}

/// GET /api/attendance
pub async fn get_attendance(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Json<SessionStatus> {
    Json(state.scans.status(&owner).await)
}

/// POST /api/attendance/start
///
/// 409 when a session is already running.
pub async fn start_session(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<SessionStatus>> {
    Ok(Json(state.scans.start(&owner).await?))
}

/// POST /api/attendance/stop
pub async fn stop_session(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> Json<SessionStatus> {
    Json(state.scans.stop(&owner).await)
}

/// POST /api/attendance/scan
pub async fn manual_scan(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(request): Json<ManualScanRequest>,
) -> ApiResult<Json<ScanOutcome>> {
    Ok(Json(state.scans.submit_scan(&owner, &request.tag_id).await?))
}

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/attendance", get(get_attendance))
        .route("/api/attendance/start", post(start_session))
        .route("/api/attendance/stop", post(stop_session))
        .route("/api/attendance/scan", post(manual_scan))
}
