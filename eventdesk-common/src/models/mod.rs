//! Domain records
//!
//! Every stored record carries the `OwnerId` of the account whose data
//! partition it belongs to.

pub mod device;
pub mod expense;
pub mod notification;
pub mod owner;
pub mod shift;
pub mod tag;
pub mod team;

pub use device::{LightingChannel, LightingState, TemperatureBand, TemperatureReading};
pub use expense::{EventGroup, Expense, ExpenseCategory, MainCategory, NewEventGroup, NewExpense};
pub use notification::Notification;
pub use owner::OwnerId;
pub use shift::{Shift, ShiftDraft};
pub use tag::{AttendanceEntry, PersonType, TagAssignment, TagId};
pub use team::{AccessLevel, MemberDraft, TeamMember};

/// Placeholder rendered for references that no longer resolve
pub const UNKNOWN_NAME: &str = "Unknown";

pub(crate) fn require_text(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn require_amount(field: &str, value: f64) -> crate::Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(crate::Error::Validation(format!(
            "{} must be a non-negative amount, got {}",
            field, value
        )));
    }
    Ok(())
}
