//! Database bootstrap and row-parsing helpers

pub mod init;

pub use init::*;

use crate::{Error, OwnerId, Result};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Parse an RFC 3339 timestamp read back from the store
pub fn parse_stored_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidRecord(format!("bad timestamp '{}': {}", text, e)))
}

/// Render a timestamp the way the store keeps it
pub fn to_stored_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

/// Parse the owner column of a stored row
pub fn parse_stored_owner(text: &str) -> Result<OwnerId> {
    OwnerId::parse(text).ok_or_else(|| Error::InvalidRecord("row has a blank owner_id".to_string()))
}

/// Parse an enum-like column of a stored row
///
/// Text that does not parse is an invalid record, never a default value.
pub fn parse_stored_field<T: FromStr>(column: &str, text: &str) -> Result<T> {
    text.parse::<T>()
        .map_err(|_| Error::InvalidRecord(format!("bad {} '{}'", column, text)))
}
