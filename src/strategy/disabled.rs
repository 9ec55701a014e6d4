//! Strategy that caches nothing.

use crate::cache::{BotId, ConversationId, MessageSource};

use super::RecallCacheStrategy;

/// Never caches, so recalls never resolve. The cheapest strategy and the
/// default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStrategy;

impl<P> RecallCacheStrategy<P> for DisabledStrategy {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn on_group_message_sent(&self, _: BotId, _: ConversationId, _: &MessageSource, _: P) {}

    fn on_friend_message_sent(&self, _: BotId, _: ConversationId, _: &MessageSource, _: P) {}

    fn lookup_group_recall(&self, _: BotId, _: ConversationId, _: &MessageSource) -> Option<P> {
        None
    }

    fn lookup_friend_recall(&self, _: BotId, _: ConversationId, _: &MessageSource) -> Option<P> {
        None
    }

    fn on_bot_session_ended(&self, _: BotId) {}
}
