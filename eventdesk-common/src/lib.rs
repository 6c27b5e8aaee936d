//! # EventDesk Common Library
//!
//! Shared code for the EventDesk services including:
//! - Domain records (owners, event groups, expenses, roster, shifts, tags)
//! - Error taxonomy
//! - Configuration loading
//! - Database bootstrap
//! - Event bus and SSE helpers
//! - Time and id utilities

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod sse;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::OwnerId;
