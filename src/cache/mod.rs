//! Cache Module
//!
//! SQLite-backed key-value cache with lazy TTL expiration.

mod entry;
pub mod expiry;
pub mod schema;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiry::Expiry;
pub use store::SqliteCache;
