use crate::application::errors::BotError;
use crate::domain::entities::{ConversationTurn, Message};
use crate::domain::traits::Channel;

/// Builds the conversation sent to the completion backend from channel history
pub struct ContextBuilder {
    persona: String,
    prefix: String,
    history_limit: usize,
}

impl ContextBuilder {
    pub fn new(persona: impl Into<String>, prefix: impl Into<String>, history_limit: usize) -> Self {
        Self {
            persona: persona.into(),
            prefix: prefix.into(),
            history_limit,
        }
    }

    /// Fetch recent history and turn the requester's own chat messages into turns
    pub async fn build(
        &self,
        channel: &dyn Channel,
        channel_id: &str,
        author_id: &str,
    ) -> Result<Vec<ConversationTurn>, BotError> {
        let history = channel.fetch_recent(channel_id, self.history_limit).await?;
        Ok(self.turns_from_history(&history, author_id))
    }

    /// Turns for `author_id` in fetch order, behind the persona turn
    pub fn turns_from_history(&self, history: &[Message], author_id: &str) -> Vec<ConversationTurn> {
        std::iter::once(self.persona_turn())
            .chain(
                history
                    .iter()
                    .filter(|msg| self.is_own_chat(msg, author_id))
                    .map(|msg| ConversationTurn::user(msg.content.clone())),
            )
            .collect()
    }

    /// Context holding only the persona turn
    pub fn persona_turn(&self) -> ConversationTurn {
        ConversationTurn::system(self.persona.clone())
    }

    fn is_own_chat(&self, msg: &Message, author_id: &str) -> bool {
        !msg.has_prefix(&self.prefix) && !msg.author.is_bot && msg.author.id == author_id
    }
}
