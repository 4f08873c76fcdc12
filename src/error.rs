//! Error types for lrukit.
//!
//! - [`ConfigError`]: a capacity or K value was rejected by a constructor,
//!   the builder, or `resize`.
//! - [`InvariantError`]: returned by the debug-only `check_invariants`
//!   methods when the index and the two lists disagree.
//!
//! Missing keys are never errors; lookups return `Option`/`bool`.
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru_k::LrukCache;
//!
//! let cache: Result<LrukCache<u64, u64>, ConfigError> = LrukCache::try_new(100, 2);
//! assert!(cache.is_ok());
//!
//! let err = LrukCache::<u64, u64>::try_new(100, 0).unwrap_err();
//! assert!(err.to_string().contains("k"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Invalid cache configuration.
///
/// Carries a human-readable description of the rejected parameter. When this
/// is returned the cache is either not built or, for `resize`, left exactly
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::new("capacity must be positive, got 0")
    }

    pub(crate) fn zero_k() -> Self {
        Self::new("k must be positive, got 0")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Internal bookkeeping disagreement found by `check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
