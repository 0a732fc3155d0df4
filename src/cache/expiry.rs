//! Expiry Module
//!
//! Integer encoding of absolute time and the relative/absolute expiry argument.
//!
//! Timestamps are Unix epoch milliseconds in UTC. The same encoding is used for
//! the stored `Expires` column and for "now", so plain integer comparison decides
//! whether an entry is expired.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Timestamp Functions ==
/// Returns the current time as Unix epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Adds a duration to an encoded timestamp, saturating at `i64::MAX`.
pub fn add_duration(timestamp: i64, duration: Duration) -> i64 {
    let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
    timestamp.saturating_add(millis)
}

/// Encodes an absolute date.
pub fn from_datetime(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Decodes a stored timestamp, or None if it is outside chrono's range.
pub fn to_datetime(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp)
}

// == Expiry ==
/// When an entry should expire: after a duration from now, or at a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Relative to the moment the operation runs
    After(Duration),
    /// Absolute point in time
    At(DateTime<Utc>),
}

impl Expiry {
    /// Resolves to an encoded absolute timestamp relative to `now`.
    pub fn resolve(&self, now: i64) -> i64 {
        match self {
            Expiry::After(duration) => add_duration(now, *duration),
            Expiry::At(at) => from_datetime(*at),
        }
    }
}

impl From<Duration> for Expiry {
    fn from(duration: Duration) -> Self {
        Expiry::After(duration)
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(at: DateTime<Utc>) -> Self {
        Expiry::At(at)
    }
}
