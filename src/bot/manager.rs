//! Bot manager - registers sessions and routes events to them.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use super::events::{BotEvent, RecallResolved};
use super::session::BotSession;
use crate::cache::{BotId, ScopeKind};
use crate::error::Result;
use crate::strategy::{RecallCacheStrategy, StrategyConfig};

/// Owns the recall cache strategy shared by every bot it registers.
pub struct BotManager<P> {
    strategy: Arc<dyn RecallCacheStrategy<P>>,
    sessions: DashMap<BotId, Arc<BotSession<P>>>,
}

impl<P> BotManager<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Create a manager, building (and validating) the configured strategy.
    pub fn new(config: &StrategyConfig) -> Result<Self> {
        Ok(Self::with_strategy(config.build()?))
    }

    pub fn with_strategy(strategy: Arc<dyn RecallCacheStrategy<P>>) -> Self {
        Self {
            strategy,
            sessions: DashMap::new(),
        }
    }

    pub fn strategy(&self) -> &Arc<dyn RecallCacheStrategy<P>> {
        &self.strategy
    }

    /// Get the session for a bot, starting one if needed.
    pub fn register(&self, bot_id: BotId) -> Arc<BotSession<P>> {
        self.sessions
            .entry(bot_id)
            .or_insert_with(|| {
                info!("Registered bot {}", bot_id);
                Arc::new(BotSession::new(bot_id, Arc::clone(&self.strategy)))
            })
            .clone()
    }

    pub fn session(&self, bot_id: BotId) -> Option<Arc<BotSession<P>>> {
        self.sessions.get(&bot_id).map(|s| Arc::clone(s.value()))
    }

    /// End a bot's session and drop its caches. Unknown ids are ignored.
    pub fn unregister(&self, bot_id: BotId) {
        if let Some((_, session)) = self.sessions.remove(&bot_id) {
            session.close();
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Route one event.
    ///
    /// Returns the lookup result for recall events and `None` otherwise.
    /// Sessions are started on their first event.
    pub fn dispatch(&self, event: BotEvent<P>) -> Option<RecallResolved<P>> {
        if let BotEvent::BotOffline { bot_id } = event {
            self.unregister(bot_id);
            return None;
        }

        let session = self.register(event.bot_id());

        match event {
            BotEvent::GroupMessage {
                group_id,
                source,
                payload,
                ..
            } => {
                session.on_group_message(group_id, &source, payload);
                None
            }
            BotEvent::FriendMessage {
                friend_id,
                source,
                payload,
                ..
            } => {
                session.on_friend_message(friend_id, &source, payload);
                None
            }
            BotEvent::GroupRecall {
                bot_id,
                group_id,
                source,
            } => {
                let content = session.group_recall(group_id, &source);
                debug!("Group recall in {} resolved: {}", group_id, content.is_some());
                Some(RecallResolved {
                    bot_id,
                    scope: ScopeKind::Group,
                    conversation_id: group_id,
                    source,
                    content,
                })
            }
            BotEvent::FriendRecall {
                bot_id,
                friend_id,
                source,
            } => {
                let content = session.friend_recall(friend_id, &source);
                debug!("Friend recall from {} resolved: {}", friend_id, content.is_some());
                Some(RecallResolved {
                    bot_id,
                    scope: ScopeKind::Friend,
                    conversation_id: friend_id,
                    source,
                    content,
                })
            }
            BotEvent::BotOffline { .. } => None,
        }
    }

    /// End every session.
    pub fn shutdown(&self) {
        let ids: Vec<BotId> = self.sessions.iter().map(|s| *s.key()).collect();
        for id in ids {
            self.unregister(id);
        }
    }
}

impl<P> std::fmt::Debug for BotManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotManager")
            .field("strategy", &self.strategy.name())
            .field("session_count", &self.sessions.len())
            .finish()
    }
}
