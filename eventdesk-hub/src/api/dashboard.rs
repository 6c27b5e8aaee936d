//! Dashboard summary endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use eventdesk_common::time;
use serde::Serialize;

use crate::api::auth::CurrentOwner;
use crate::api::expenses::GroupFilter;
use crate::error::ApiResult;
use crate::services::expenses::{self as expense_service, ExpenseSummary};
use crate::services::{shift_ledger, AttendanceCounts};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub expenses: ExpenseSummary,
    pub session_active: bool,
    pub attendance: AttendanceCounts,
    /// Shifts starting and ending within today's local date
    pub expected_staff_today: usize,
    /// Staff taps in the current session dated today
    pub scanned_staff_today: usize,
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Query(filter): Query<GroupFilter>,
) -> ApiResult<Json<DashboardResponse>> {
    let now = time::now();
    let offset = state.settings.utc_offset;

    let expenses = expense_service::expense_summary(&state.db, &owner, filter.group_id).await?;
    let expected_staff_today =
        shift_ledger::expected_staff_today(&state.db, &owner, now, offset).await?;

    let status = state.scans.status(&owner).await;
    let scanned_staff_today = match state.scans.feed(&owner).await {
        Some(feed) => feed
            .lock()
            .await
            .staff_scanned_on(time::local_date(now, offset), offset),
        None => 0,
    };

    Ok(Json(DashboardResponse {
        expenses,
        session_active: status.active,
        attendance: status.counts,
        expected_staff_today,
        scanned_staff_today,
    }))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(get_dashboard))
}
