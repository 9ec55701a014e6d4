//! Error types.
//!
//! Only construction can fail. Lookups report a miss as `None`.

use thiserror::Error;

use crate::cache::ScopeKind;

/// Errors raised while building a cache strategy.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{scope} cache capacity must be positive, got {value}")]
    InvalidCapacity { scope: ScopeKind, value: usize },

    #[error("{scope} cache capacity {value} exceeds the maximum of {max}")]
    CapacityTooLarge {
        scope: ScopeKind,
        value: usize,
        max: usize,
    },

    #[error("load factor must be within [0.1, 1], got {0}")]
    InvalidLoadFactor(f32),

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("unknown recall cache strategy '{0}'")]
    UnknownStrategy(String),

    #[error("invalid strategy config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
