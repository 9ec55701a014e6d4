//! Bot module - sessions, event routing and lifecycle.

pub mod events;
mod manager;
mod session;

pub use events::{BotEvent, RecallResolved};
pub use manager::BotManager;
pub use session::BotSession;
