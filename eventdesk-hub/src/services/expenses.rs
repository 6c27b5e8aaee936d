//! Expense recording and budget projections

use crate::db::{expenses, groups};
use chrono::{DateTime, FixedOffset, Utc};
use eventdesk_common::models::{EventGroup, Expense, ExpenseCategory, NewExpense, UNKNOWN_NAME};
use eventdesk_common::{time, uuid_utils, OwnerId, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Validate and store an expense, stamped with the local date and time
pub async fn record_expense(
    pool: &SqlitePool,
    owner: &OwnerId,
    draft: &NewExpense,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Expense> {
    let (category, main_category) = draft.validate()?;
    let (date, time) = time::local_stamp(now, offset);

    let expense = Expense {
        id: uuid_utils::generate(),
        title: draft.title.trim().to_string(),
        category,
        main_category,
        amount: draft.amount,
        description: draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        date,
        time,
        group_id: draft.group_id,
        owner_id: owner.clone(),
    };

    expenses::insert_expense(pool, &expense).await?;
    info!(expense_id = %expense.id, group_id = %expense.group_id, amount = expense.amount, "Recorded expense");
    Ok(expense)
}

/// Expense row with its group name resolved
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRow {
    #[serde(flatten)]
    pub expense: Expense,
    pub group_name: String,
}

pub async fn list_expense_rows(
    pool: &SqlitePool,
    owner: &OwnerId,
    group_id: Option<Uuid>,
) -> Result<Vec<ExpenseRow>> {
    let names: HashMap<Uuid, String> = groups::list_groups(pool, owner)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    Ok(expenses::list_expenses(pool, owner, group_id)
        .await?
        .into_iter()
        .map(|expense| ExpenseRow {
            group_name: names
                .get(&expense.group_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            expense,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
}

/// Totals over the selected expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub group_id: Option<Uuid>,
    pub total: f64,
    /// Always Food, Transport, Lodging, Others
    pub by_category: Vec<CategoryTotal>,
    pub total_budget: f64,
    pub budget_used_ratio: f64,
}

/// Pure projection; `expenses` must already be filtered
pub fn summarize(
    expenses: &[Expense],
    groups: &[EventGroup],
    group_id: Option<Uuid>,
) -> ExpenseSummary {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let by_category = ExpenseCategory::ALL
        .iter()
        .map(|category| CategoryTotal {
            category: *category,
            total: expenses
                .iter()
                .filter(|e| e.category == *category)
                .map(|e| e.amount)
                .sum(),
        })
        .collect();
    let total_budget: f64 = groups.iter().map(|g| g.budget).sum();
    let budget_used_ratio = if total_budget > 0.0 {
        total / total_budget
    } else {
        0.0
    };

    ExpenseSummary {
        group_id,
        total,
        by_category,
        total_budget,
        budget_used_ratio,
    }
}

pub async fn expense_summary(
    pool: &SqlitePool,
    owner: &OwnerId,
    group_id: Option<Uuid>,
) -> Result<ExpenseSummary> {
    let selected = expenses::list_expenses(pool, owner, group_id).await?;
    let all_groups = groups::list_groups(pool, owner).await?;
    Ok(summarize(&selected, &all_groups, group_id))
}
