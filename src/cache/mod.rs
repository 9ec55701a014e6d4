//! Cache module - bounded recall-message caches.
//!
//! Recall notifications only identify a message, they never carry its
//! content. This module keeps recently seen messages around so a recall
//! can be resolved back to what was said.
//!
//! ## Architecture
//!
//! - `CacheKey` - key derived from message ids and time only
//! - `LruMap` - bounded access-ordered map
//! - `ScopeCache` - one locked `LruMap` per group or friend
//! - `BotCacheRegistry` - lazily created scopes per bot, torn down together
//!
//! ## Usage
//!
//! ```rust
//! use recall_cache::cache::{BotCacheRegistry, CacheConfig, MessageSource};
//!
//! let registry = BotCacheRegistry::new(CacheConfig::group(), CacheConfig::friend());
//! let source = MessageSource::new([5], [9], 1000);
//!
//! registry.friend_scope(1, 42).put(source.cache_key(), "hello");
//! let recalled = registry.friend_scope(1, 42).get(&source.cache_key());
//! assert_eq!(recalled, Some("hello"));
//! ```

mod config;
mod key;
mod lru;
mod registry;
mod scope;

pub use config::{
    CacheConfig, DEFAULT_FRIEND_MAX_SIZE, DEFAULT_GROUP_MAX_SIZE, DEFAULT_LOAD_FACTOR, MAX_CAPACITY,
    MIN_LOAD_FACTOR, ScopeKind,
};
pub use key::{CacheKey, MessageSource};
pub use lru::{Keys, LruMap};
pub use registry::{BotCacheRegistry, BotId, ConversationId};
pub use scope::ScopeCache;
