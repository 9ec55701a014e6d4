//! Inbound events handled by the recall cache.

use serde::{Deserialize, Serialize};

use crate::cache::{BotId, ConversationId, MessageSource, ScopeKind};

/// Notification from the event-mapping layer.
///
/// Message events carry the payload to cache; recall events carry only the
/// identifying fields of the withdrawn message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BotEvent<P> {
    GroupMessage {
        bot_id: BotId,
        group_id: ConversationId,
        source: MessageSource,
        payload: P,
    },
    FriendMessage {
        bot_id: BotId,
        friend_id: ConversationId,
        source: MessageSource,
        payload: P,
    },
    GroupRecall {
        bot_id: BotId,
        group_id: ConversationId,
        source: MessageSource,
    },
    /// `friend_id` is the author of the recalled message.
    FriendRecall {
        bot_id: BotId,
        friend_id: ConversationId,
        source: MessageSource,
    },
    BotOffline {
        bot_id: BotId,
    },
}

impl<P> BotEvent<P> {
    pub fn bot_id(&self) -> BotId {
        match self {
            Self::GroupMessage { bot_id, .. }
            | Self::FriendMessage { bot_id, .. }
            | Self::GroupRecall { bot_id, .. }
            | Self::FriendRecall { bot_id, .. }
            | Self::BotOffline { bot_id } => *bot_id,
        }
    }

    pub fn is_recall(&self) -> bool {
        matches!(self, Self::GroupRecall { .. } | Self::FriendRecall { .. })
    }
}

/// Outcome of a recall lookup, handed back before the recall is delivered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallResolved<P> {
    pub bot_id: BotId,
    pub scope: ScopeKind,
    pub conversation_id: ConversationId,
    pub source: MessageSource,
    /// `None` when the message is no longer (or never was) cached.
    pub content: Option<P>,
}
