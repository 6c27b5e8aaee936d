//! Expense persistence

use eventdesk_common::db::{parse_stored_field, parse_stored_owner};
use eventdesk_common::models::Expense;
use eventdesk_common::{uuid_utils, OwnerId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn expense_from_row(row: &SqliteRow) -> Result<Expense> {
    let id: String = row.get("id");
    let group_id: String = row.get("group_id");
    let category: String = row.get("category");
    let main_category: String = row.get("main_category");
    let owner: String = row.get("owner_id");

    Ok(Expense {
        id: uuid_utils::parse_stored(&id)?,
        title: row.get("title"),
        category: parse_stored_field("category", &category)?,
        main_category: parse_stored_field("main_category", &main_category)?,
        amount: row.get("amount"),
        description: row.get("description"),
        date: row.get("date"),
        time: row.get("time"),
        group_id: uuid_utils::parse_stored(&group_id)?,
        owner_id: parse_stored_owner(&owner)?,
    })
}

/// Save a fully stamped expense
pub async fn insert_expense(pool: &SqlitePool, expense: &Expense) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO expenses (
            id, owner_id, group_id, title, category, main_category,
            amount, description, date, time, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(expense.id.to_string())
    .bind(expense.owner_id.as_str())
    .bind(expense.group_id.to_string())
    .bind(&expense.title)
    .bind(expense.category.as_str())
    .bind(expense.main_category.as_str())
    .bind(expense.amount)
    .bind(&expense.description)
    .bind(&expense.date)
    .bind(&expense.time)
    .execute(pool)
    .await?;

    Ok(())
}

/// Expenses of the owner, newest first, optionally limited to one group
pub async fn list_expenses(
    pool: &SqlitePool,
    owner: &OwnerId,
    group_id: Option<Uuid>,
) -> Result<Vec<Expense>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, group_id, title, category, main_category,
               amount, description, date, time
        FROM expenses
        WHERE owner_id = ?1 AND (?2 IS NULL OR group_id = ?2)
        ORDER BY date DESC, time DESC, rowid DESC
        "#,
    )
    .bind(owner.as_str())
    .bind(group_id.map(|id| id.to_string()))
    .fetch_all(pool)
    .await?;

    rows.iter().map(expense_from_row).collect()
}

/// Returns true when a row was removed
pub async fn delete_expense(pool: &SqlitePool, owner: &OwnerId, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM expenses WHERE owner_id = ? AND id = ?")
        .bind(owner.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
