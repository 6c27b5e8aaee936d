//! Store access, one module per collection
//!
//! Every function takes the caller's owner id and filters by it.

pub mod expenses;
pub mod groups;
pub mod notifications;
pub mod shifts;
pub mod tags;
pub mod team;
