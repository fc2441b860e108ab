//! Domain traits - Abstractions for infrastructure implementations

pub mod channel;
pub mod cache;

pub use channel::{Channel, BotInfo};
pub use cache::ResponseCache;
