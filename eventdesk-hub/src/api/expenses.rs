//! Event group and expense endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use eventdesk_common::models::{EventGroup, Expense, NewEventGroup, NewExpense};
use eventdesk_common::{time, Error};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::auth::CurrentOwner;
use crate::db::{expenses, groups};
use crate::error::ApiResult;
use crate::services::expenses::{self as expense_service, ExpenseRow, ExpenseSummary};
use crate::AppState;

/// Optional `?group_id=` filter; absent means all groups
#[derive(Debug, Default, Deserialize)]
pub struct GroupFilter {
    pub group_id: Option<Uuid>,
}

/// GET /api/groups
pub async fn list_groups(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
) -> ApiResult<Json<Vec<EventGroup>>> {
    Ok(Json(groups::list_groups(&state.db, &owner).await?))
}

/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(draft): Json<NewEventGroup>,
) -> ApiResult<(StatusCode, Json<EventGroup>)> {
    let group = groups::insert_group(&state.db, &owner, &draft).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/groups/:id
pub async fn get_group(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EventGroup>> {
    let group = groups::load_group(&state.db, &owner, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("group {}", id)))?;
    Ok(Json(group))
}

/// DELETE /api/groups/:id
///
/// Expenses of the group are kept and show up under "Unknown".
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !groups::delete_group(&state.db, &owner, id).await? {
        return Err(Error::NotFound(format!("group {}", id)).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Query(filter): Query<GroupFilter>,
) -> ApiResult<Json<Vec<ExpenseRow>>> {
    let rows = expense_service::list_expense_rows(&state.db, &owner, filter.group_id).await?;
    Ok(Json(rows))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Json(draft): Json<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = expense_service::record_expense(
        &state.db,
        &owner,
        &draft,
        time::now(),
        state.settings.utc_offset,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !expenses::delete_expense(&state.db, &owner, id).await? {
        return Err(Error::NotFound(format!("expense {}", id)).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/expenses/summary
pub async fn expense_summary(
    State(state): State<AppState>,
    CurrentOwner(owner): CurrentOwner,
    Query(filter): Query<GroupFilter>,
) -> ApiResult<Json<ExpenseSummary>> {
    let summary = expense_service::expense_summary(&state.db, &owner, filter.group_id).await?;
    Ok(Json(summary))
}

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/api/groups", get(list_groups).post(create_group))
        .route("/api/groups/:id", get(get_group).delete(delete_group))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/summary", get(expense_summary))
        .route("/api/expenses/:id", delete(delete_expense))
}
