//! Error types for the collkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (e.g. zero cache capacity).
//! - [`InvariantError`]: Returned when internal data-structure invariants
//!   are violated ([`check_invariants`](crate::lfu::LfuCache::check_invariants)).
//!
//! Contract violations are detected synchronously, before any state is
//! mutated. Internal corruption discovered on a hot path is a programming
//! fault and panics instead of returning an error.
//!
//! ## Example Usage
//!
//! ```
//! use collkit::error::ConfigError;
//! use collkit::lfu::LfuCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<LfuCache<String, i32>, ConfigError> = LfuCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = LfuCache::<String, i32>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LfuCache::try_new`](crate::lfu::LfuCache::try_new). Carries a
/// human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use collkit::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
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

/// Error returned when internal structural invariants are violated.
///
/// Produced by [`LfuCache::check_invariants`](crate::lfu::LfuCache::check_invariants),
/// which walks the cache's coupled structures (primary map, count index,
/// frequency buckets) and reports the first inconsistency it finds. A
/// non-`Ok` result indicates corrupted structure, not a user-facing
/// condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
