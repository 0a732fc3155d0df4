//! Cache Store Module
//!
//! Cache engine over a single SQLite connection with lazy TTL expiration.

use std::fmt;

use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::cache::expiry::{now_ms, Expiry};
use crate::cache::{schema, CacheEntry};
use crate::config::CacheTarget;
use crate::error::{CacheError, Result};

// == Sqlite Cache ==
/// Key-value cache persisted in a `DataCache` table.
///
/// Statements run one at a time on the connection's own thread. Calls are not
/// batched or coordinated beyond that, so callers that need strict ordering on
/// a key must serialize their own calls.
///
/// The connection is released by [`SqliteCache::close`] or when the cache is
/// dropped, whichever comes first.
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    // == Open ==
    /// Opens the connection for `target`, keys it with `passphrase` if given,
    /// and applies the schema.
    pub(crate) async fn open(target: CacheTarget, passphrase: Option<String>) -> Result<Self> {
        let conn = match &target {
            CacheTarget::InMemory => Connection::open_in_memory().await?,
            CacheTarget::File(path) => Connection::open(path).await?,
        };
        // From here on, returning early drops `cache` and releases the connection
        let cache = Self { conn };
        let encrypted = passphrase.is_some();

        if let Some(passphrase) = passphrase {
            cache.apply_key(passphrase).await?;
        }
        cache.initialize().await?;

        info!(data_source = %target, encrypted, "Cache connection opened");
        Ok(cache)
    }

    async fn apply_key(&self, passphrase: String) -> Result<()> {
        // Plain SQLite ignores unknown pragmas, so check for SQLCipher first
        let cipher: Option<String> = self
            .conn
            .call(|conn| {
                Ok(conn
                    .query_row("PRAGMA cipher_version", [], |row| row.get(0))
                    .optional()?)
            })
            .await?;
        if cipher.is_none() {
            return Err(CacheError::EncryptionUnavailable);
        }

        self.conn
            .call(move |conn| Ok(conn.pragma_update(None, "key", &passphrase)?))
            .await?;
        Ok(())
    }

    /// Applies the schema. Safe to call more than once.
    pub async fn initialize(&self) -> Result<()> {
        self.conn.call(|conn| Ok(schema::apply(conn)?)).await?;
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Deletes every expired row first (not only `key`), then looks the key up.
    /// Returns `None` if no live row exists.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let key = key.to_owned();

        let value = self
            .conn
            .call(move |conn| {
                let removed = conn.execute(schema::DELETE_EXPIRED, [now_ms()])?;
                if removed > 0 {
                    debug!(removed, "Swept expired entries");
                }

                let value = conn
                    .query_row(schema::SELECT_VALUE, [&key], |row| row.get::<_, String>(0))
                    .optional()?;
                debug!(key = %key, hit = value.is_some(), "Cache get");
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    // == Set ==
    /// Stores a value that never expires.
    ///
    /// An existing row for `key` is replaced, including its expiry.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.store(key, value, None).await
    }

    /// Stores a value that expires after a duration or at a fixed time.
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry: impl Into<Expiry>,
    ) -> Result<()> {
        self.store(key, value, Some(expiry.into())).await
    }

    async fn store(&self, key: &str, value: &str, expiry: Option<Expiry>) -> Result<()> {
        validate_key(key)?;
        let key = key.to_owned();
        let value = value.to_owned();

        self.conn
            .call(move |conn| {
                let expires_at = expiry.map(|e| e.resolve(now_ms()));
                conn.execute(schema::UPSERT, params![key, value, expires_at])?;
                debug!(key = %key, expires_at, "Cache set");
                Ok(())
            })
            .await?;
        Ok(())
    }

    // == Expire ==
    /// Changes the expiry of an existing entry. Does nothing if `key` is absent.
    pub async fn expire(&self, key: &str, expiry: impl Into<Expiry>) -> Result<()> {
        validate_key(key)?;
        let key = key.to_owned();
        let expiry = expiry.into();

        self.conn
            .call(move |conn| {
                let expires_at = expiry.resolve(now_ms());
                let updated = conn.execute(schema::UPDATE_EXPIRES, params![key, expires_at])?;
                debug!(key = %key, expires_at, updated, "Cache expire");
                Ok(())
            })
            .await?;
        Ok(())
    }

    // == Remove ==
    /// Removes an entry. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let key = key.to_owned();

        self.conn
            .call(move |conn| {
                let removed = conn.execute(schema::DELETE_KEY, [&key])?;
                debug!(key = %key, removed, "Cache remove");
                Ok(())
            })
            .await?;
        Ok(())
    }

    // == Keys ==
    /// Lists every stored key in no particular order.
    ///
    /// No sweep runs here, so keys of expired entries that no `get` has cleaned
    /// up yet are included.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let keys = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_KEYS)?;
                let keys = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(keys)
            })
            .await?;
        Ok(keys)
    }

    // == Entry ==
    /// Reads the raw row for `key`, expired or not, without sweeping.
    pub async fn entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        validate_key(key)?;
        let key = key.to_owned();

        let entry = self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row(schema::SELECT_ENTRY, [&key], CacheEntry::from_row)
                    .optional()?)
            })
            .await?;
        Ok(entry)
    }

    // == Purge Expired ==
    /// Runs the expiry sweep on its own.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> Result<usize> {
        let removed = self
            .conn
            .call(|conn| {
                let removed = conn.execute(schema::DELETE_EXPIRED, [now_ms()])?;
                debug!(removed, "Purged expired entries");
                Ok(removed)
            })
            .await?;
        Ok(removed)
    }

    // == Close ==
    /// Closes the connection and waits until SQLite has released it.
    ///
    /// Consumes the cache, so the connection is closed exactly once. Dropping
    /// the cache instead releases it in the background.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Cache connection closed");
        Ok(())
    }
}

impl fmt::Debug for SqliteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCache").finish_non_exhaustive()
    }
}

// == Helpers ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::empty("key"));
    }
    Ok(())
}
