//! Cache configuration.

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Default per-group capacity.
pub const DEFAULT_GROUP_MAX_SIZE: usize = 1536;

/// Default per-friend capacity.
pub const DEFAULT_FRIEND_MAX_SIZE: usize = 96;

/// Default load factor used to pre-size the hash index.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Largest accepted per-conversation capacity.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Smallest accepted load factor.
pub const MIN_LOAD_FACTOR: f32 = 0.1;

/// Upper bound on the hash index pre-size. Larger scopes grow on demand.
const MAX_TABLE_PRESIZE: usize = 1 << 16;

/// Which kind of conversation a scope caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Group,
    Friend,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Friend => "friend",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one scope cache. Immutable once the cache exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of messages held per conversation.
    pub capacity: usize,

    /// Load factor of the hash index.
    pub load_factor: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::group()
    }
}

impl CacheConfig {
    /// Create a new cache config with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Default config for group scopes.
    pub fn group() -> Self {
        Self::with_capacity(DEFAULT_GROUP_MAX_SIZE)
    }

    /// Default config for friend scopes.
    pub fn friend() -> Self {
        Self::with_capacity(DEFAULT_FRIEND_MAX_SIZE)
    }

    /// Set the load factor (builder pattern).
    #[must_use]
    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Reject configs that would silently misbehave later.
    pub fn validate(&self, kind: ScopeKind) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity {
                scope: kind,
                value: self.capacity,
            });
        }
        if self.capacity > MAX_CAPACITY {
            return Err(CacheError::CapacityTooLarge {
                scope: kind,
                value: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        validate_load_factor(self.load_factor)
    }

    /// Hash index size that holds `capacity` entries without rehashing,
    /// capped so that no config can trigger an oversized allocation.
    pub fn initial_table_size(&self) -> usize {
        let size = self.capacity as f64 / self.load_factor as f64;
        if !size.is_finite() || size >= MAX_TABLE_PRESIZE as f64 {
            return MAX_TABLE_PRESIZE;
        }
        (size as usize).saturating_add(1).min(MAX_TABLE_PRESIZE)
    }
}

fn validate_load_factor(load_factor: f32) -> Result<()> {
    if !load_factor.is_finite() || load_factor < MIN_LOAD_FACTOR || load_factor > 1.0 {
        return Err(CacheError::InvalidLoadFactor(load_factor));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(CacheConfig::group().capacity, 1536);
        assert_eq!(CacheConfig::friend().capacity, 96);
        assert_eq!(CacheConfig::default().load_factor, 0.75);
    }

    #[test]
    fn test_initial_table_size() {
        assert_eq!(CacheConfig::group().initial_table_size(), 2049);
        assert_eq!(CacheConfig::friend().initial_table_size(), 129);
        assert_eq!(CacheConfig::with_capacity(10).load_factor(1.0).initial_table_size(), 11);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = CacheConfig::with_capacity(0).validate(ScopeKind::Friend).unwrap_err();
        assert!(matches!(
            err,
            CacheError::InvalidCapacity { scope: ScopeKind::Friend, value: 0 }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_load_factor() {
        for lf in [0.0, -0.5, 1e-30, 0.05, 1.5, f32::NAN, f32::INFINITY] {
            let result = CacheConfig::group().load_factor(lf).validate(ScopeKind::Group);
            assert!(matches!(result, Err(CacheError::InvalidLoadFactor(_))));
        }
        assert!(CacheConfig::group().load_factor(1.0).validate(ScopeKind::Group).is_ok());
        assert!(CacheConfig::group().load_factor(0.1).validate(ScopeKind::Group).is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_capacity() {
        let err = CacheConfig::with_capacity(usize::MAX).validate(ScopeKind::Group).unwrap_err();
        assert!(matches!(
            err,
            CacheError::CapacityTooLarge { scope: ScopeKind::Group, .. }
        ));
        assert!(CacheConfig::with_capacity(MAX_CAPACITY).validate(ScopeKind::Group).is_ok());
    }

    #[test]
    fn test_initial_table_size_is_capped() {
        // Unvalidated configs still reach ScopeCache::new through the registry.
        assert_eq!(CacheConfig::with_capacity(usize::MAX).initial_table_size(), 1 << 16);
        assert_eq!(CacheConfig::group().load_factor(1e-30).initial_table_size(), 1 << 16);
        assert_eq!(CacheConfig::group().load_factor(0.0).initial_table_size(), 1 << 16);
        assert_eq!(CacheConfig::group().load_factor(f32::NAN).initial_table_size(), 1 << 16);
        assert_eq!(CacheConfig::with_capacity(0).initial_table_size(), 1);
    }
}
