//! Bot session - owns the recall cache handle for one bot.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::{BotId, ConversationId, MessageSource};
use crate::strategy::RecallCacheStrategy;

/// A running bot session.
///
/// Holds the strategy handle the event-mapping layer uses for this bot.
/// Closing the session (explicitly or on drop) releases everything the
/// strategy cached for it; after that, sends are ignored and recalls
/// resolve to `None`.
///
/// Sends and lookups hold the read side of `closed` for their whole call
/// into the strategy, and `close` flips the flag under the write side, so
/// once `close` has the flag no call can reach the strategy for this bot
/// and nothing gets cached after the caches are released.
pub struct BotSession<P> {
    id: BotId,
    strategy: Arc<dyn RecallCacheStrategy<P>>,
    closed: RwLock<bool>,
}

impl<P> BotSession<P> {
    pub fn new(id: BotId, strategy: Arc<dyn RecallCacheStrategy<P>>) -> Self {
        Self {
            id,
            strategy,
            closed: RwLock::new(false),
        }
    }

    pub fn id(&self) -> BotId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Record a message seen in a group.
    pub fn on_group_message(&self, group_id: ConversationId, source: &MessageSource, payload: P) {
        let closed = self.closed.read();
        if *closed {
            return;
        }
        self.strategy
            .on_group_message_sent(self.id, group_id, source, payload);
    }

    /// Record a message seen in a friend conversation.
    pub fn on_friend_message(&self, friend_id: ConversationId, source: &MessageSource, payload: P) {
        let closed = self.closed.read();
        if *closed {
            return;
        }
        self.strategy
            .on_friend_message_sent(self.id, friend_id, source, payload);
    }

    /// Content of a recalled group message, if still cached.
    pub fn group_recall(&self, group_id: ConversationId, source: &MessageSource) -> Option<P> {
        let closed = self.closed.read();
        if *closed {
            return None;
        }
        self.strategy.lookup_group_recall(self.id, group_id, source)
    }

    /// Content of a recalled friend message, if still cached.
    ///
    /// Friend recalls are scoped by the author, who is the friend.
    pub fn friend_recall(&self, friend_id: ConversationId, source: &MessageSource) -> Option<P> {
        let closed = self.closed.read();
        if *closed {
            return None;
        }
        self.strategy.lookup_friend_recall(self.id, friend_id, source)
    }

    /// End the session. Only the first call reaches the strategy.
    pub fn close(&self) {
        {
            let mut closed = self.closed.write();
            if *closed {
                return;
            }
            *closed = true;
        }
        // In-flight sends finished before the write lock was granted and
        // later ones see the flag, so the lock is not needed past this point.
        info!("Bot {} session ended ({})", self.id, self.strategy.name());
        self.strategy.on_bot_session_ended(self.id);
    }
}

impl<P> Drop for BotSession<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P> std::fmt::Debug for BotSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotSession")
            .field("id", &self.id)
            .field("strategy", &self.strategy.name())
            .field("closed", &self.is_closed())
            .finish()
    }
}
