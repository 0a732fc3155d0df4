//! Simple Cache - an embeddable key-value cache
//!
//! Text values with optional per-entry expiration, persisted in SQLite (in
//! memory or in a file) and optionally encrypted at rest.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, Expiry, SqliteCache};
pub use config::{CacheConfiguration, CacheTarget};
pub use error::{CacheError, Result};

/// Starts configuring a new cache.
pub fn configure() -> CacheConfiguration {
    CacheConfiguration::new()
}
