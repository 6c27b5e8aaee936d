//! Timestamp and calendar-day utilities
//!
//! Timestamps are stored and exchanged in UTC. "Local" means the operator's
//! fixed UTC offset from configuration.

use crate::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Build the operator's fixed offset from a minute count
pub fn fixed_offset(utc_offset_minutes: i32) -> Result<FixedOffset> {
    utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            Error::Config(format!("Invalid UTC offset: {} minutes", utc_offset_minutes))
        })
}

/// Local calendar date of a UTC timestamp
pub fn local_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    timestamp.with_timezone(&offset).date_naive()
}

/// UTC bounds `[start, end)` of one local calendar day
pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - Duration::seconds(offset.local_minus_utc() as i64);
    let start = Utc.from_utc_datetime(&utc_midnight);
    (start, start + Duration::days(1))
}

/// 12-hour clock rendering in local time, e.g. `9:00 AM`
pub fn format_clock(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%-I:%M %p")
        .to_string()
}

/// Local `(YYYY-MM-DD, HH:MM:SS)` stamp for a timestamp
pub fn local_stamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> (String, String) {
    let local = timestamp.with_timezone(&offset);
    (
        local.format("%Y-%m-%d").to_string(),
        local.format("%H:%M:%S").to_string(),
    )
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}
