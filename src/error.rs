//! Error types for the lrukit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a capacity is rejected or a cache is
//!   configured a second time.
//! - [`InvalidArgument`]: Returned when an operation receives an argument it
//!   cannot accept (a null key passed to `add`).
//! - [`CacheError`]: Umbrella error for the shared-cache surface.
//!
//! All errors signal caller misuse. They are synchronous and never transient,
//! so retrying the same call yields the same error.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::{CacheError, ConfigError};
//! use lrukit::shared::SharedCache;
//!
//! let cache: SharedCache<u32, String> = SharedCache::new();
//! assert!(cache.configure(8).is_ok());
//!
//! let err = cache.configure(16).unwrap_err();
//! assert_eq!(err, ConfigError::AlreadyConfigured);
//!
//! let err: CacheError = err.into();
//! assert!(err.to_string().contains("already been configured"));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration is rejected.
///
/// Produced by [`SharedCache::configure`](crate::shared::SharedCache::configure),
/// [`CacheConfig::new`](crate::config::CacheConfig::new) and
/// [`LruStore::try_new`](crate::store::lru::LruStore::try_new).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity was zero, negative, or not representable as `usize`.
    #[error("capacity must be greater than 0 (got {requested})")]
    InvalidCapacity {
        /// The rejected value, rendered as text so negatives survive.
        requested: String,
    },

    /// The cache has already been configured since creation or last reset.
    #[error("cache has already been configured")]
    AlreadyConfigured,
}

impl ConfigError {
    /// Creates an [`InvalidCapacity`](ConfigError::InvalidCapacity) error for `requested`.
    #[inline]
    pub fn invalid_capacity(requested: impl ToString) -> Self {
        Self::InvalidCapacity {
            requested: requested.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// InvalidArgument
// ---------------------------------------------------------------------------

/// Error returned when an argument is unusable, e.g. a null key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{param}`: {reason}")]
pub struct InvalidArgument {
    param: &'static str,
    reason: &'static str,
}

impl InvalidArgument {
    /// Creates a new `InvalidArgument` for parameter `param`.
    #[inline]
    pub fn new(param: &'static str, reason: &'static str) -> Self {
        Self { param, reason }
    }

    /// Error raised when `add` receives a null key.
    #[inline]
    pub fn null_key() -> Self {
        Self::new("key", "key must not be null")
    }

    /// Name of the rejected parameter.
    #[inline]
    pub fn param(&self) -> &'static str {
        self.param
    }
}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Errors surfaced by the shared cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

impl CacheError {
    /// Returns `true` for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, CacheError::Config(_))
    }

    /// Returns `true` for invalid-argument errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CacheError::InvalidArgument(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
