//! Cache Entry Module
//!
//! Row model of the `DataCache` table.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use crate::cache::expiry::{now_ms, to_datetime};

// == Cache Entry ==
/// A single persisted cache row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Unique key
    pub key: String,
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    /// Maps a `SELECT Key, Value, Expires` row.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            value: row.get(1)?,
            expires_at: row.get(2)?,
        })
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// An entry whose expiry is at or before `now` counts as expired, matching
    /// the `Expires <= now` sweep.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => expires <= now,
            None => false,
        }
    }

    /// Checks whether the entry is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_ms())
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = now_ms();
            u64::try_from(expires.saturating_sub(now)).unwrap_or(0)
        })
    }

    /// Expiration as a date, if set and representable.
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(to_datetime)
    }
}
