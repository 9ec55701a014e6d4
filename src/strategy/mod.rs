//! Recall-message cache strategies.
//!
//! The event-mapping layer calls a strategy when a message is seen and again
//! when a recall arrives, before the recall reaches application code.
//! Strategies must be quick: they run ahead of every message event.
//!
//! Two strategies ship with the crate:
//!
//! - `DisabledStrategy` - caches nothing, every recall is unresolved (default)
//! - `MemoryLruStrategy` - bounded in-memory LRU per bot and conversation

mod disabled;
mod memory_lru;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{
    BotId, ConversationId, DEFAULT_FRIEND_MAX_SIZE, DEFAULT_GROUP_MAX_SIZE, DEFAULT_LOAD_FACTOR,
    MessageSource,
};
use crate::error::Result;

pub use disabled::DisabledStrategy;
pub use memory_lru::MemoryLruStrategy;

/// Policy for remembering messages so recalls can be resolved.
///
/// `P` is the cached payload; it is stored and handed back as-is.
/// A `None` lookup is a normal outcome: cold cache, eviction, a disabled
/// strategy, or a message seen before startup.
pub trait RecallCacheStrategy<P>: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Remember a group message.
    fn on_group_message_sent(
        &self,
        bot_id: BotId,
        group_id: ConversationId,
        source: &MessageSource,
        payload: P,
    );

    /// Remember a friend message.
    fn on_friend_message_sent(
        &self,
        bot_id: BotId,
        friend_id: ConversationId,
        source: &MessageSource,
        payload: P,
    );

    /// Resolve a group recall to the cached message.
    fn lookup_group_recall(
        &self,
        bot_id: BotId,
        group_id: ConversationId,
        source: &MessageSource,
    ) -> Option<P>;

    /// Resolve a friend recall to the cached message.
    fn lookup_friend_recall(
        &self,
        bot_id: BotId,
        friend_id: ConversationId,
        source: &MessageSource,
    ) -> Option<P>;

    /// Release everything cached for a bot whose session ended.
    fn on_bot_session_ended(&self, bot_id: BotId);
}

fn default_group_max_size() -> usize {
    DEFAULT_GROUP_MAX_SIZE
}

fn default_friend_max_size() -> usize {
    DEFAULT_FRIEND_MAX_SIZE
}

fn default_load_factor() -> f32 {
    DEFAULT_LOAD_FACTOR
}

/// Serializable strategy selection.
///
/// ```json
/// { "type": "memory_lru", "groupMaxSize": 1536, "friendMaxSize": 96, "loadFactor": 0.75 }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Cache nothing.
    #[default]
    #[serde(alias = "invalid")]
    Disabled,

    /// Bounded in-memory LRU.
    #[serde(rename_all = "camelCase")]
    MemoryLru {
        #[serde(default = "default_group_max_size")]
        group_max_size: usize,
        #[serde(default = "default_friend_max_size")]
        friend_max_size: usize,
        #[serde(default = "default_load_factor")]
        load_factor: f32,
    },
}

impl StrategyConfig {
    /// LRU strategy with default sizes.
    pub fn memory_lru() -> Self {
        Self::MemoryLru {
            group_max_size: DEFAULT_GROUP_MAX_SIZE,
            friend_max_size: DEFAULT_FRIEND_MAX_SIZE,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Parse a JSON strategy config.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the configured strategy. Invalid sizes fail here, never later.
    pub fn build<P>(&self) -> Result<Arc<dyn RecallCacheStrategy<P>>>
    where
        P: Clone + Send + Sync + 'static,
    {
        let strategy: Arc<dyn RecallCacheStrategy<P>> = match *self {
            Self::Disabled => Arc::new(DisabledStrategy),
            Self::MemoryLru {
                group_max_size,
                friend_max_size,
                load_factor,
            } => Arc::new(MemoryLruStrategy::<P>::new(
                group_max_size,
                friend_max_size,
                load_factor,
            )?),
        };

        info!("Recall cache strategy: {}", strategy.name());
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_default_is_disabled() {
        assert_eq!(StrategyConfig::default(), StrategyConfig::Disabled);
        let strategy = StrategyConfig::default().build::<String>().unwrap();
        assert_eq!(strategy.name(), "disabled");
    }

    #[test]
    fn test_parse_disabled_and_alias() {
        assert_eq!(
            StrategyConfig::from_json(r#"{"type":"disabled"}"#).unwrap(),
            StrategyConfig::Disabled
        );
        assert_eq!(
            StrategyConfig::from_json(r#"{"type":"invalid"}"#).unwrap(),
            StrategyConfig::Disabled
        );
    }

    #[test]
    fn test_parse_memory_lru_with_defaults() {
        let config = StrategyConfig::from_json(r#"{"type":"memory_lru","groupMaxSize":10}"#).unwrap();
        assert_eq!(
            config,
            StrategyConfig::MemoryLru {
                group_max_size: 10,
                friend_max_size: 96,
                load_factor: 0.75,
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let result = StrategyConfig::from_json(r#"{"type":"custom_properties"}"#);
        assert!(matches!(result, Err(CacheError::Json(_))));
    }

    #[test]
    fn test_build_rejects_zero_capacity() {
        let config = StrategyConfig::MemoryLru {
            group_max_size: 0,
            friend_max_size: 96,
            load_factor: 0.75,
        };
        assert!(matches!(
            config.build::<String>(),
            Err(CacheError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_build_memory_lru() {
        let strategy = StrategyConfig::memory_lru().build::<String>().unwrap();
        assert_eq!(strategy.name(), "memory_lru");

        let source = MessageSource::new([5], [9], 1000);
        strategy.on_group_message_sent(1, 100, &source, "hi".into());
        assert_eq!(strategy.lookup_group_recall(1, 100, &source).as_deref(), Some("hi"));
    }
}
