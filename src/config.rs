//! Configuration Module
//!
//! Fluent builder that validates cache settings and opens a ready cache.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::SqliteCache;
use crate::error::{CacheError, Result};

/// Data source name SQLite uses for a private in-memory database.
pub const IN_MEMORY_DATA_SOURCE: &str = ":memory:";

// == Cache Target ==
/// Where the cache keeps its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTarget {
    /// Private in-memory database, gone when the cache closes
    InMemory,
    /// Database file, created if missing
    File(PathBuf),
}

impl fmt::Display for CacheTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTarget::InMemory => f.write_str(IN_MEMORY_DATA_SOURCE),
            CacheTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// == Cache Configuration ==
/// Builder for [`SqliteCache`].
///
/// Setters only touch local state; nothing is opened until
/// [`CacheConfiguration::build_cache`].
///
/// ```no_run
/// # async fn demo() -> simple_cache::error::Result<()> {
/// let cache = simple_cache::configure()
///     .using_file("cache.db")?
///     .build_cache()
///     .await?;
/// cache.set("greeting", "hello").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct CacheConfiguration {
    target: Option<CacheTarget>,
    passphrase: Option<String>,
}

impl CacheConfiguration {
    /// Creates an empty configuration with no target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `SIMPLE_CACHE_FILE` - Database file (default: in memory)
    /// - `SIMPLE_CACHE_PASSWORD` - Passphrase for encryption at rest (default: none)
    ///
    /// Empty or blank values are treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let target = match lookup("SIMPLE_CACHE_FILE").filter(|v| !v.is_empty()) {
            Some(path) => CacheTarget::File(PathBuf::from(path)),
            None => CacheTarget::InMemory,
        };
        let passphrase = lookup("SIMPLE_CACHE_PASSWORD").filter(|v| !v.trim().is_empty());

        Self {
            target: Some(target),
            passphrase,
        }
    }

    // == In Memory ==
    /// Keeps the cache in memory. Replaces any previously chosen file.
    pub fn in_memory(&mut self) -> &mut Self {
        self.target = Some(CacheTarget::InMemory);
        self
    }

    // == Using File ==
    /// Stores the cache in the file at `path`. Replaces any previous target.
    pub fn using_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CacheError::empty("path"));
        }

        self.target = Some(CacheTarget::File(path.to_path_buf()));
        Ok(self)
    }

    // == Encrypt ==
    /// Encrypts the store at rest with `password`.
    pub fn encrypt(&mut self, password: &str) -> Result<&mut Self> {
        if password.trim().is_empty() {
            return Err(CacheError::blank("password"));
        }

        self.passphrase = Some(password.to_string());
        Ok(self)
    }

    /// The chosen target, if any.
    pub fn target(&self) -> Option<&CacheTarget> {
        self.target.as_ref()
    }

    /// Whether a passphrase has been set.
    pub fn is_encrypted(&self) -> bool {
        self.passphrase.is_some()
    }

    // == Build Cache ==
    /// Opens the store, applies the schema and returns the cache.
    ///
    /// Fails with [`CacheError::NotConfigured`] before touching storage if no
    /// target was chosen. Connection and schema errors are returned as-is.
    pub async fn build_cache(&self) -> Result<SqliteCache> {
        let target = self.target.clone().ok_or(CacheError::NotConfigured)?;

        info!(data_source = %target, encrypted = self.is_encrypted(), "Building cache");
        SqliteCache::open(target, self.passphrase.clone()).await
    }
}

impl fmt::Debug for CacheConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfiguration")
            .field("target", &self.target)
            .field("encrypted", &self.is_encrypted())
            .finish()
    }
}
