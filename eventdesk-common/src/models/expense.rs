//! Event groups and expenses

use super::{require_amount, require_text, OwnerId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Budgeted event that expenses and shifts are grouped under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    pub id: Uuid,
    pub name: String,
    pub budget: f64,
    pub owner_id: OwnerId,
}

/// Form payload for a new event group
#[derive(Debug, Clone, Deserialize)]
pub struct NewEventGroup {
    pub name: String,
    pub budget: f64,
}

impl NewEventGroup {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_amount("budget", self.budget)
    }
}

/// What an expense was spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Lodging,
    Others,
}

impl ExpenseCategory {
    /// Fixed display order for per-category totals
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Lodging,
        ExpenseCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Lodging => "Lodging",
            ExpenseCategory::Others => "Others",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Food" => Ok(ExpenseCategory::Food),
            "Transport" => Ok(ExpenseCategory::Transport),
            "Lodging" => Ok(ExpenseCategory::Lodging),
            "Others" => Ok(ExpenseCategory::Others),
            other => Err(Error::Validation(format!("unknown expense category: {}", other))),
        }
    }
}

/// Who an expense was spent for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    Event,
    Staff,
    Participant,
}

impl MainCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MainCategory::Event => "Event",
            MainCategory::Staff => "Staff",
            MainCategory::Participant => "Participant",
        }
    }
}

impl FromStr for MainCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Event" => Ok(MainCategory::Event),
            "Staff" => Ok(MainCategory::Staff),
            "Participant" => Ok(MainCategory::Participant),
            other => Err(Error::Validation(format!("unknown main category: {}", other))),
        }
    }
}

/// A recorded spend against an event group
///
/// Immutable once stored; can only be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub category: ExpenseCategory,
    pub main_category: MainCategory,
    pub amount: f64,
    pub description: Option<String>,
    /// Local calendar date of creation (`YYYY-MM-DD`)
    pub date: String,
    /// Local wall-clock time of creation (`HH:MM:SS`)
    pub time: String,
    pub group_id: Uuid,
    pub owner_id: OwnerId,
}

/// Form payload for a new expense
///
/// Category fields arrive as text so an unknown value is a validation
/// error rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub category: String,
    pub main_category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub group_id: Uuid,
}

impl NewExpense {
    /// Validate and return the parsed category pair
    pub fn validate(&self) -> Result<(ExpenseCategory, MainCategory)> {
        require_text("title", &self.title)?;
        require_amount("amount", self.amount)?;
        let category = self.category.parse::<ExpenseCategory>()?;
        let main_category = self.main_category.parse::<MainCategory>()?;
        Ok((category, main_category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_budget_must_be_non_negative() {
        let group = NewEventGroup {
            name: "Gala".to_string(),
            budget: -1.0,
        };
        assert!(matches!(group.validate(), Err(Error::Validation(_))));

        let group = NewEventGroup {
            name: "Gala".to_string(),
            budget: 0.0,
        };
        assert!(group.validate().is_ok());
    }

    #[test]
    fn test_expense_rejects_unknown_category() {
        let expense = NewExpense {
            title: "Taxi".to_string(),
            category: "Fuel".to_string(),
            main_category: "Staff".to_string(),
            amount: 12.5,
            description: None,
            group_id: Uuid::new_v4(),
        };
        assert!(matches!(expense.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_expense_rejects_nan_amount() {
        let expense = NewExpense {
            title: "Taxi".to_string(),
            category: "Transport".to_string(),
            main_category: "Staff".to_string(),
            amount: f64::NAN,
            description: None,
            group_id: Uuid::new_v4(),
        };
        assert!(expense.validate().is_err());
    }
}
