//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its configuration builder.
#[derive(Error, Debug)]
pub enum CacheError {
    /// An argument failed validation before any storage access
    #[error("Invalid argument `{param}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        param: &'static str,
        /// What was wrong with it
        reason: &'static str,
    },

    /// `build_cache` was called before a target was chosen
    #[error("Cache is not completely configured")]
    NotConfigured,

    /// A passphrase was given but the linked SQLite has no cipher support
    #[error("Encryption requested but SQLite was built without SQLCipher")]
    EncryptionUnavailable,

    /// The connection thread is gone
    #[error("Cache connection is closed")]
    Closed,

    /// Failure reported by the storage engine, passed through untouched
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    /// Internal error reported by the connection thread
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    // == Argument Helpers ==
    pub(crate) fn empty(param: &'static str) -> Self {
        CacheError::InvalidArgument {
            param,
            reason: "must not be empty",
        }
    }

    pub(crate) fn blank(param: &'static str) -> Self {
        CacheError::InvalidArgument {
            param,
            reason: "must not be empty or whitespace",
        }
    }

    /// Returns the parameter name for `InvalidArgument` errors.
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            CacheError::InvalidArgument { param, .. } => Some(param),
            _ => None,
        }
    }
}

// == Connection Errors ==
impl From<tokio_rusqlite::Error> for CacheError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(err) => CacheError::Storage(err),
            tokio_rusqlite::Error::Close((_, err)) => CacheError::Storage(err),
            tokio_rusqlite::Error::ConnectionClosed => CacheError::Closed,
            other => CacheError::Internal(other.to_string()),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_param() {
        let err = CacheError::empty("key");
        assert_eq!(err.param_name(), Some("key"));
        assert_eq!(err.to_string(), "Invalid argument `key`: must not be empty");
    }

    #[test]
    fn test_not_configured_message() {
        assert_eq!(
            CacheError::NotConfigured.to_string(),
            "Cache is not completely configured"
        );
        assert_eq!(CacheError::NotConfigured.param_name(), None);
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let inner = rusqlite::Error::QueryReturnedNoRows;
        let expected = inner.to_string();
        let err: CacheError = inner.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_connection_errors_map_to_cache_errors() {
        let closed: CacheError = tokio_rusqlite::Error::ConnectionClosed.into();
        assert!(matches!(closed, CacheError::Closed));

        let storage: CacheError =
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows).into();
        assert!(matches!(
            storage,
            CacheError::Storage(rusqlite::Error::QueryReturnedNoRows)
        ));
    }
}
