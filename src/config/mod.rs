//! Configuration module.
//!
//! Loads the recall cache strategy from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_FRIEND_MAX_SIZE, DEFAULT_GROUP_MAX_SIZE, DEFAULT_LOAD_FACTOR};
use crate::error::{CacheError, Result};
use crate::strategy::StrategyConfig;

/// Full strategy config as JSON. Overrides every other variable.
pub const ENV_CONFIG: &str = "RECALL_CACHE_CONFIG";
pub const ENV_STRATEGY: &str = "RECALL_CACHE_STRATEGY";
pub const ENV_GROUP_MAX_SIZE: &str = "RECALL_CACHE_GROUP_MAX_SIZE";
pub const ENV_FRIEND_MAX_SIZE: &str = "RECALL_CACHE_FRIEND_MAX_SIZE";
pub const ENV_LOAD_FACTOR: &str = "RECALL_CACHE_LOAD_FACTOR";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub strategy: StrategyConfig,
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(json) = lookup(ENV_CONFIG).filter(|s| !s.trim().is_empty()) {
            return Ok(Self {
                strategy: StrategyConfig::from_json(&json)?,
            });
        }

        let name = lookup(ENV_STRATEGY)
            .unwrap_or_else(|| "disabled".to_string())
            .trim()
            .to_lowercase();

        let strategy = match name.as_str() {
            "" | "disabled" | "invalid" => StrategyConfig::Disabled,
            "memory_lru" => StrategyConfig::MemoryLru {
                group_max_size: parse_var(&lookup, ENV_GROUP_MAX_SIZE, DEFAULT_GROUP_MAX_SIZE)?,
                friend_max_size: parse_var(&lookup, ENV_FRIEND_MAX_SIZE, DEFAULT_FRIEND_MAX_SIZE)?,
                load_factor: parse_var(&lookup, ENV_LOAD_FACTOR, DEFAULT_LOAD_FACTOR)?,
            },
            _ => return Err(CacheError::UnknownStrategy(name)),
        };

        Ok(Self { strategy })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidEnv { key, value: raw }),
    }
}
