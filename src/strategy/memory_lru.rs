//! In-memory LRU strategy.

use tracing::debug;

use crate::cache::{
    BotCacheRegistry, BotId, CacheConfig, ConversationId, MessageSource, ScopeKind,
};
use crate::error::Result;

use super::RecallCacheStrategy;

/// Caches recent messages in memory, separately per bot and per group or
/// friend. Each conversation holds at most its configured number of
/// messages, so memory stays bounded no matter the message volume.
pub struct MemoryLruStrategy<P> {
    registry: BotCacheRegistry<P>,
}

impl<P: Clone> MemoryLruStrategy<P> {
    /// Create the strategy, rejecting capacities outside `1..=MAX_CAPACITY`
    /// and load factors outside `[MIN_LOAD_FACTOR, 1]`.
    pub fn new(group_max_size: usize, friend_max_size: usize, load_factor: f32) -> Result<Self> {
        Self::with_configs(
            CacheConfig::with_capacity(group_max_size).load_factor(load_factor),
            CacheConfig::with_capacity(friend_max_size).load_factor(load_factor),
        )
    }

    pub fn with_configs(group: CacheConfig, friend: CacheConfig) -> Result<Self> {
        group.validate(ScopeKind::Group)?;
        friend.validate(ScopeKind::Friend)?;

        debug!(
            "Memory LRU strategy: group capacity {}, friend capacity {}, load factor {}",
            group.capacity, friend.capacity, group.load_factor
        );

        Ok(Self {
            registry: BotCacheRegistry::new(group, friend),
        })
    }

    pub fn registry(&self) -> &BotCacheRegistry<P> {
        &self.registry
    }
}

impl<P> RecallCacheStrategy<P> for MemoryLruStrategy<P>
where
    P: Clone + Send + Sync,
{
    fn name(&self) -> &'static str {
        "memory_lru"
    }

    fn on_group_message_sent(
        &self,
        bot_id: BotId,
        group_id: ConversationId,
        source: &MessageSource,
        payload: P,
    ) {
        self.registry
            .group_scope(bot_id, group_id)
            .put(source.cache_key(), payload);
    }

    fn on_friend_message_sent(
        &self,
        bot_id: BotId,
        friend_id: ConversationId,
        source: &MessageSource,
        payload: P,
    ) {
        self.registry
            .friend_scope(bot_id, friend_id)
            .put(source.cache_key(), payload);
    }

    fn lookup_group_recall(
        &self,
        bot_id: BotId,
        group_id: ConversationId,
        source: &MessageSource,
    ) -> Option<P> {
        let key = source.cache_key();
        let found = self.registry.group_scope(bot_id, group_id).get(&key);
        if found.is_none() {
            debug!("Recall cache miss in group {} for bot {}: {}", group_id, bot_id, key);
        }
        found
    }

    fn lookup_friend_recall(
        &self,
        bot_id: BotId,
        friend_id: ConversationId,
        source: &MessageSource,
    ) -> Option<P> {
        let key = source.cache_key();
        let found = self.registry.friend_scope(bot_id, friend_id).get(&key);
        if found.is_none() {
            debug!("Recall cache miss from friend {} for bot {}: {}", friend_id, bot_id, key);
        }
        found
    }

    fn on_bot_session_ended(&self, bot_id: BotId) {
        self.registry.dispose(bot_id);
    }
}

impl<P> std::fmt::Debug for MemoryLruStrategy<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLruStrategy")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn source(seq: i32) -> MessageSource {
        MessageSource::new([seq], [9], 1000)
    }

    #[test]
    fn test_group_recall_resolves_exact_key_only() {
        let strategy = MemoryLruStrategy::new(1536, 96, 0.75).unwrap();
        strategy.on_group_message_sent(1, 100, &source(5), "hi".to_string());

        assert_eq!(strategy.lookup_group_recall(1, 100, &source(5)).as_deref(), Some("hi"));
        assert_eq!(strategy.lookup_group_recall(1, 100, &source(6)), None);
    }

    #[test]
    fn test_evicted_recall_is_unavailable() {
        let strategy = MemoryLruStrategy::new(2, 96, 0.75).unwrap();
        for (seq, text) in [(1, "one"), (2, "two"), (3, "three")] {
            strategy.on_group_message_sent(1, 100, &source(seq), text.to_string());
        }

        assert_eq!(strategy.lookup_group_recall(1, 100, &source(1)), None);
        assert_eq!(strategy.lookup_group_recall(1, 100, &source(2)).as_deref(), Some("two"));
        assert_eq!(strategy.lookup_group_recall(1, 100, &source(3)).as_deref(), Some("three"));
    }

    #[test]
    fn test_friend_and_group_do_not_mix() {
        let strategy = MemoryLruStrategy::new(4, 4, 0.75).unwrap();
        strategy.on_friend_message_sent(1, 42, &source(1), "dm".to_string());

        assert_eq!(strategy.lookup_group_recall(1, 42, &source(1)), None);
        assert_eq!(strategy.lookup_friend_recall(1, 42, &source(1)).as_deref(), Some("dm"));
        assert_eq!(strategy.lookup_friend_recall(2, 42, &source(1)), None);
    }

    #[test]
    fn test_friend_capacity_independent_of_group() {
        let strategy = MemoryLruStrategy::new(8, 1, 0.75).unwrap();
        strategy.on_friend_message_sent(1, 42, &source(1), "a".to_string());
        strategy.on_friend_message_sent(1, 42, &source(2), "b".to_string());

        assert_eq!(strategy.lookup_friend_recall(1, 42, &source(1)), None);
        assert_eq!(strategy.lookup_friend_recall(1, 42, &source(2)).as_deref(), Some("b"));
    }

    #[test]
    fn test_session_end_drops_only_that_bot() {
        let strategy = MemoryLruStrategy::new(4, 4, 0.75).unwrap();
        strategy.on_group_message_sent(1, 100, &source(1), "bot1".to_string());
        strategy.on_group_message_sent(2, 100, &source(1), "bot2".to_string());

        strategy.on_bot_session_ended(1);

        assert_eq!(strategy.lookup_group_recall(1, 100, &source(1)), None);
        assert_eq!(strategy.lookup_group_recall(2, 100, &source(1)).as_deref(), Some("bot2"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(matches!(
            MemoryLruStrategy::<String>::new(96, 0, 0.75),
            Err(CacheError::InvalidCapacity { scope: ScopeKind::Friend, .. })
        ));
        assert!(matches!(
            MemoryLruStrategy::<String>::new(96, 96, 0.0),
            Err(CacheError::InvalidLoadFactor(_))
        ));
    }

    #[test]
    fn test_rejects_configs_that_would_overflow_presize() {
        assert!(matches!(
            MemoryLruStrategy::<String>::new(1536, 96, 1e-30),
            Err(CacheError::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            MemoryLruStrategy::<String>::new(usize::MAX, 96, 0.75),
            Err(CacheError::CapacityTooLarge { scope: ScopeKind::Group, .. })
        ));
    }

    #[test]
    fn test_largest_accepted_config_caches() {
        let strategy =
            MemoryLruStrategy::new(crate::cache::MAX_CAPACITY, 96, crate::cache::MIN_LOAD_FACTOR)
                .unwrap();
        strategy.on_group_message_sent(1, 100, &source(5), "hi".to_string());
        assert_eq!(strategy.lookup_group_recall(1, 100, &source(5)).as_deref(), Some("hi"));
    }

    #[test]
    fn test_concurrent_senders_and_recalls() {
        let strategy = MemoryLruStrategy::new(64, 8, 0.75).unwrap();
        std::thread::scope(|s| {
            for group in 0..4i64 {
                let strategy = &strategy;
                s.spawn(move || {
                    for seq in 0..500 {
                        strategy.on_group_message_sent(1, group, &source(seq), seq);
                        let _ = strategy.lookup_group_recall(1, group, &source(seq - 3));
                    }
                });
            }
        });

        for group in 0..4i64 {
            let scope = strategy.registry().group_scope(1, group);
            assert_eq!(scope.len(), 64);
            assert_eq!(strategy.lookup_group_recall(1, group, &source(499)), Some(499));
        }
    }
}
