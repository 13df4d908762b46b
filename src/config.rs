//! Capacity configuration shared by the store and the lifecycle layer.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Capacity a cache starts with until it is explicitly configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// Validated cache configuration.
///
/// # Example
///
/// ```
/// use lrukit::config::{CacheConfig, DEFAULT_CAPACITY};
///
/// assert_eq!(CacheConfig::default().capacity(), DEFAULT_CAPACITY);
/// assert_eq!(CacheConfig::new(8).unwrap().capacity(), 8);
/// assert!(CacheConfig::new(0).is_err());
/// assert!(CacheConfig::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheConfig {
    capacity: NonZeroUsize,
}

impl CacheConfig {
    /// Builds a configuration, rejecting capacities below 1.
    ///
    /// Accepts any integer type so negative requests are reported as
    /// [`ConfigError::InvalidCapacity`] instead of failing to type-check.
    pub fn new<C>(capacity: C) -> Result<Self, ConfigError>
    where
        C: TryInto<usize> + fmt::Display + Copy,
    {
        capacity
            .try_into()
            .ok()
            .and_then(NonZeroUsize::new)
            .map(|capacity| Self { capacity })
            .ok_or_else(|| ConfigError::invalid_capacity(capacity))
    }

    /// Wraps an already non-zero capacity.
    #[inline]
    pub const fn from_non_zero(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }

    /// Configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    #[inline]
    pub fn non_zero_capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        match NonZeroUsize::new(DEFAULT_CAPACITY) {
            Some(capacity) => Self { capacity },
            None => unreachable!("DEFAULT_CAPACITY is non-zero"),
        }
    }
}
