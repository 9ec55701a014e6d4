//! Recall cache - resolves recalled chat messages back to their content.
//!
//! A recall (message withdrawal) notification identifies a message but
//! never carries its content. This crate remembers recently seen messages
//! per bot and per conversation so a recall can be answered with what was
//! actually said.
//!
//! ## Architecture
//!
//! - `cache` - key derivation, bounded LRU scopes and the per-bot registry
//! - `strategy` - the policy seam called by the event-mapping layer
//! - `bot` - bot sessions owning the strategy handle, and event routing
//! - `config` - environment configuration
//! - `error` - construction errors

pub mod bot;
pub mod cache;
pub mod config;
pub mod error;
pub mod strategy;

pub use bot::{BotEvent, BotManager, BotSession, RecallResolved};
pub use cache::{CacheKey, MessageSource};
pub use error::{CacheError, Result};
pub use strategy::{DisabledStrategy, MemoryLruStrategy, RecallCacheStrategy, StrategyConfig};
