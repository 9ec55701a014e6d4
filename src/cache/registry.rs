//! Cache registry - per-bot ownership of scope caches.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use super::{CacheConfig, ScopeCache, ScopeKind};

/// Bot account id.
pub type BotId = i64;

/// Group or friend id.
pub type ConversationId = i64;

/// Scope caches belonging to a single bot.
struct BotCaches<P> {
    groups: DashMap<ConversationId, Arc<ScopeCache<P>>>,
    friends: DashMap<ConversationId, Arc<ScopeCache<P>>>,
}

impl<P> BotCaches<P> {
    fn new() -> Self {
        Self {
            groups: DashMap::new(),
            friends: DashMap::new(),
        }
    }

    fn namespace(&self, kind: ScopeKind) -> &DashMap<ConversationId, Arc<ScopeCache<P>>> {
        match kind {
            ScopeKind::Group => &self.groups,
            ScopeKind::Friend => &self.friends,
        }
    }
}

/// Registry of scope caches, keyed by bot and then by conversation.
///
/// Every level is a sharded concurrent map with atomic get-or-insert, so
/// the first message of a conversation creates exactly one cache even when
/// many dispatch threads race for it, and unrelated conversations never
/// wait on the same lock.
///
/// ## Example
///
/// ```rust
/// use recall_cache::cache::{BotCacheRegistry, CacheConfig, CacheKey};
///
/// let registry = BotCacheRegistry::new(CacheConfig::group(), CacheConfig::friend());
/// let key = CacheKey::derive(&[5], &[9], 1000);
///
/// registry.group_scope(1, 100).put(key.clone(), "hi");
/// assert_eq!(registry.group_scope(1, 100).get(&key), Some("hi"));
///
/// registry.dispose(1);
/// assert_eq!(registry.group_scope(1, 100).get(&key), None);
/// ```
pub struct BotCacheRegistry<P> {
    bots: DashMap<BotId, Arc<BotCaches<P>>>,
    group_config: CacheConfig,
    friend_config: CacheConfig,
}

impl<P: Clone> BotCacheRegistry<P> {
    /// Create an empty registry. Configs are not validated here.
    pub fn new(group_config: CacheConfig, friend_config: CacheConfig) -> Self {
        Self {
            bots: DashMap::new(),
            group_config,
            friend_config,
        }
    }

    /// Get or create the cache for a group of a bot.
    pub fn group_scope(&self, bot_id: BotId, group_id: ConversationId) -> Arc<ScopeCache<P>> {
        self.scope(ScopeKind::Group, bot_id, group_id)
    }

    /// Get or create the cache for a friend of a bot.
    pub fn friend_scope(&self, bot_id: BotId, friend_id: ConversationId) -> Arc<ScopeCache<P>> {
        self.scope(ScopeKind::Friend, bot_id, friend_id)
    }

    fn scope(&self, kind: ScopeKind, bot_id: BotId, id: ConversationId) -> Arc<ScopeCache<P>> {
        // Clone out of the outer map so its shard lock is released before
        // the inner map is touched.
        let bot = self.bot_caches(bot_id);

        let config = match kind {
            ScopeKind::Group => self.group_config,
            ScopeKind::Friend => self.friend_config,
        };

        bot.namespace(kind)
            .entry(id)
            .or_insert_with(|| {
                debug!("Creating {} cache for bot {}: {}", kind, bot_id, id);
                Arc::new(ScopeCache::new(config))
            })
            .clone()
    }

    fn bot_caches(&self, bot_id: BotId) -> Arc<BotCaches<P>> {
        self.bots
            .entry(bot_id)
            .or_insert_with(|| {
                debug!("Creating cache segment for bot {}", bot_id);
                Arc::new(BotCaches::new())
            })
            .clone()
    }

    /// Drop every cache owned by a bot.
    ///
    /// Safe to call for unknown or already disposed bots. Scopes still held
    /// by in-flight calls stay usable but are no longer reachable from here.
    pub fn dispose(&self, bot_id: BotId) {
        let Some((_, bot)) = self.bots.remove(&bot_id) else {
            return;
        };

        let groups = bot.groups.len();
        let friends = bot.friends.len();

        let scopes: Vec<_> = bot
            .groups
            .iter()
            .chain(bot.friends.iter())
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        bot.groups.clear();
        bot.friends.clear();

        for scope in scopes {
            scope.clear();
        }

        info!(
            "Disposed recall caches for bot {} ({} groups, {} friends)",
            bot_id, groups, friends
        );
    }

    /// Number of bots with at least one scope.
    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }

    /// Number of group caches held for a bot.
    pub fn group_scope_count(&self, bot_id: BotId) -> usize {
        self.bots.get(&bot_id).map(|b| b.groups.len()).unwrap_or(0)
    }

    /// Number of friend caches held for a bot.
    pub fn friend_scope_count(&self, bot_id: BotId) -> usize {
        self.bots.get(&bot_id).map(|b| b.friends.len()).unwrap_or(0)
    }

    pub fn group_config(&self) -> CacheConfig {
        self.group_config
    }

    pub fn friend_config(&self) -> CacheConfig {
        self.friend_config
    }
}

impl<P> std::fmt::Debug for BotCacheRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotCacheRegistry")
            .field("bot_count", &self.bots.len())
            .field("group_config", &self.group_config)
            .field("friend_config", &self.friend_config)
            .finish()
    }
}
