use async_trait::async_trait;
use crate::domain::entities::Message;
use crate::application::errors::BotError;

/// Channel trait - abstraction for the chat transport the bot listens on
#[async_trait]
pub trait Channel: Send + Sync {
    /// Show a typing indicator in a channel
    async fn send_typing(&self, channel_id: &str) -> Result<(), BotError>;

    /// Reply to a message, returning the id of the posted reply
    async fn reply(&self, to: &Message, text: &str) -> Result<String, BotError>;

    /// Fetch up to `limit` recent messages, newest first
    async fn fetch_recent(&self, channel_id: &str, limit: usize) -> Result<Vec<Message>, BotError>;
}

/// Identity of the bot account on a transport
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}
