//! Message router - decides what to do with each inbound message and does it

use std::sync::Arc;

use crate::application::errors::BackendError;
use crate::application::services::{CommandService, CompletionService, ContextBuilder};
use crate::domain::entities::{Command, CommandContext, CommandRegistry, ConversationTurn, Message};
use crate::domain::traits::{Channel, ResponseCache};
use super::parser::MessageParser;

/// Reply sent when no completion could be produced
pub const CHAT_FAILURE_REPLY: &str = "Sorry, I couldn't come up with a reply right now.";

/// What the router decided for a message, before any I/O
#[derive(Debug)]
pub enum Route {
    /// Author is a bot account
    IgnoreBot,
    /// Message came from a channel other than the configured one
    IgnoreChannel,
    Command {
        command: Arc<Command>,
        args: Vec<String>,
    },
    Chat,
}

/// How handling a message ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    /// Command ran; `ok` is false when the failure reply was sent instead
    Command { name: String, ok: bool },
    /// Chat reply produced, `cached` when it came from the response cache
    Replied { cached: bool },
    /// Backend failed and the failure reply was sent
    ChatFailed,
    /// A reply was produced but the channel refused it
    ReplyFailed,
}

/// Routes messages from the target channel to commands or the completion backend
pub struct MessageRouter {
    channel: Arc<dyn Channel>,
    registry: Arc<CommandRegistry>,
    cache: Arc<dyn ResponseCache>,
    completion: Arc<CompletionService>,
    context: ContextBuilder,
    parser: MessageParser,
    target_channel_id: String,
}

impl MessageRouter {
    pub fn new(
        channel: Arc<dyn Channel>,
        registry: Arc<CommandRegistry>,
        cache: Arc<dyn ResponseCache>,
        completion: Arc<CompletionService>,
        context: ContextBuilder,
        parser: MessageParser,
        target_channel_id: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            registry,
            cache,
            completion,
            context,
            parser,
            target_channel_id: target_channel_id.into(),
        }
    }

    pub fn target_channel_id(&self) -> &str {
        &self.target_channel_id
    }

    /// Decide how a message is handled. No side effects.
    pub fn route(&self, message: &Message) -> Route {
        if message.author.is_bot {
            return Route::IgnoreBot;
        }
        if message.channel_id != self.target_channel_id {
            return Route::IgnoreChannel;
        }

        let parsed = self.parser.parse(&message.content);
        match self.registry.lookup(&parsed.name) {
            Some(command) => Route::Command { command, args: parsed.args },
            None => Route::Chat,
        }
    }

    /// Handle one inbound message through to its reply
    pub async fn handle(&self, message: Message) -> Outcome {
        match self.route(&message) {
            Route::IgnoreBot | Route::IgnoreChannel => Outcome::Ignored,
            Route::Command { command, args } => self.run_command(command, args, message).await,
            Route::Chat => self.chat(message).await,
        }
    }

    async fn run_command(&self, command: Arc<Command>, args: Vec<String>, message: Message) -> Outcome {
        let name = command.name.clone();
        tracing::info!("[{}] {} invoked command '{}'", message.channel_id, message.author, name);

        let ctx = CommandContext {
            message,
            args,
            channel: Arc::clone(&self.channel),
        };
        let ok = CommandService::dispatch(command, ctx).await.is_ok();

        Outcome::Command { name, ok }
    }

    async fn chat(&self, message: Message) -> Outcome {
        if let Err(e) = self.channel.send_typing(&message.channel_id).await {
            tracing::debug!("Typing indicator failed: {}", e);
        }

        let turns = match self
            .context
            .build(self.channel.as_ref(), &message.channel_id, &message.author.id)
            .await
        {
            Ok(turns) => turns,
            Err(e) => {
                tracing::warn!("History fetch failed, continuing with persona only: {}", e);
                vec![self.context.persona_turn()]
            }
        };

        // An empty cached reply counts as a miss.
        let hit = self.cache.get(&message.content).filter(|v| !v.is_empty());
        let (reply, cached) = match hit {
            Some(hit) => {
                tracing::debug!("[{}] cache hit", message.channel_id);
                (Ok(hit), true)
            }
            None => (self.complete_and_store(&message.content, &turns).await, false),
        };

        match reply {
            Ok(text) => {
                if self.send_reply(&message, &text).await {
                    Outcome::Replied { cached }
                } else {
                    Outcome::ReplyFailed
                }
            }
            Err(e) => {
                tracing::error!(
                    "Completion failed for {} in {}: {}",
                    message.author.id,
                    message.channel_id,
                    e
                );
                self.send_reply(&message, CHAT_FAILURE_REPLY).await;
                Outcome::ChatFailed
            }
        }
    }

    async fn complete_and_store(
        &self,
        key: &str,
        turns: &[ConversationTurn],
    ) -> Result<String, BackendError> {
        let reply = self.completion.complete(turns).await?;
        if !reply.is_empty() {
            self.cache.set(key, &reply);
        }
        Ok(reply)
    }

    /// Post a reply; false when the channel rejected it
    async fn send_reply(&self, to: &Message, text: &str) -> bool {
        tracing::info!(
            "Replying in {}: {}",
            to.channel_id,
            text.chars().take(100).collect::<String>()
        );
        match self.channel.reply(to, text).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Failed to send reply to {}: {}", to.id, e);
                false
            }
        }
    }
}
