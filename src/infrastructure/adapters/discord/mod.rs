//! Discord adapter

pub mod handler;
pub mod send;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, CreateMessage, GatewayIntents, GetMessages, Http, MessageId};
use serenity::Client;

use crate::application::errors::BotError;
use crate::application::messaging::MessageRouter;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{BotInfo, Channel};

pub use handler::DiscordHandler;

/// Discord caps history fetches at 100 messages per request
const MAX_FETCH: usize = 100;

/// Parse a snowflake id string into a non-zero u64
fn parse_snowflake(id: &str) -> Result<u64, BotError> {
    match id.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(BotError::Parse(format!("invalid Discord id: {:?}", id))),
        Ok(v) => Ok(v),
    }
}

/// Convert a serenity message into a domain message
pub fn to_domain(msg: &serenity::model::channel::Message) -> Message {
    let author = User {
        id: msg.author.id.to_string(),
        name: Some(msg.author.name.clone()),
        is_bot: msg.author.bot,
    };
    let timestamp = DateTime::<Utc>::from_timestamp(msg.timestamp.unix_timestamp(), 0)
        .unwrap_or_else(Utc::now);

    Message::new(msg.channel_id.to_string(), author, msg.content.clone())
        .with_id(msg.id.to_string())
        .with_timestamp(timestamp)
}

/// `Channel` over the Discord REST API
pub struct DiscordChannel {
    http: Arc<Http>,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Fetch the bot account behind the token; fails when the token is rejected
    pub async fn fetch_bot_info(&self) -> Result<BotInfo, BotError> {
        let me = self.http
            .get_current_user()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(BotInfo {
            id: me.id.to_string(),
            name: me.name.clone(),
        })
    }

    fn channel(id: &str) -> Result<ChannelId, BotError> {
        parse_snowflake(id).map(ChannelId::new)
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    async fn send_typing(&self, channel_id: &str) -> Result<(), BotError> {
        Self::channel(channel_id)?
            .broadcast_typing(&self.http)
            .await
            .map_err(|e| BotError::Transport(e.to_string()))
    }

    async fn reply(&self, to: &Message, text: &str) -> Result<String, BotError> {
        let channel_id = Self::channel(&to.channel_id)?;
        let message_id = MessageId::new(parse_snowflake(&to.id)?);

        let mut chunks = send::split_chunks(text).into_iter();
        let first = chunks.next().unwrap_or_default();

        let sent = channel_id
            .send_message(
                self.http.as_ref(),
                CreateMessage::new()
                    .content(first)
                    .reference_message((channel_id, message_id)),
            )
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        for chunk in chunks {
            channel_id
                .say(self.http.as_ref(), chunk)
                .await
                .map_err(|e| BotError::Transport(e.to_string()))?;
        }

        Ok(sent.id.to_string())
    }

    async fn fetch_recent(&self, channel_id: &str, limit: usize) -> Result<Vec<Message>, BotError> {
        let limit = limit.clamp(1, MAX_FETCH) as u8;
        let messages = Self::channel(channel_id)?
            .messages(self.http.as_ref(), GetMessages::new().limit(limit))
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        Ok(messages.iter().map(to_domain).collect())
    }
}

/// Discord transport: owns the gateway connection and feeds the router.
pub struct DiscordAdapter {
    token: String,
    router: Arc<MessageRouter>,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, router: Arc<MessageRouter>) -> Self {
        Self {
            token: token.into(),
            router,
        }
    }

    /// Connect to Discord and keep reconnecting whenever the gateway drops.
    ///
    /// Returns only when the initial login fails.
    pub async fn run(self) -> Result<(), BotError> {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = self.build_client(intents).await?;

        loop {
            tracing::info!("Discord: gateway connecting");

            match client.start().await {
                Err(serenity::Error::Gateway(e)) if is_fatal_gateway(&e) => {
                    return Err(BotError::Transport(format!("Discord login rejected: {}", e)));
                }
                Err(e) => tracing::warn!("Discord: gateway error ({}), reconnecting in 5s", e),
                Ok(()) => tracing::info!("Discord: gateway stopped cleanly, reconnecting in 5s"),
            }

            tokio::time::sleep(Duration::from_secs(5)).await;

            client = loop {
                match self.build_client(intents).await {
                    Ok(c) => break c,
                    Err(e) => {
                        tracing::error!("Discord: reconnect failed ({}), retrying in 30s", e);
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            };
        }
    }

    async fn build_client(&self, intents: GatewayIntents) -> Result<Client, BotError> {
        let handler = DiscordHandler::new(Arc::clone(&self.router));

        Client::builder(&self.token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| BotError::Transport(e.to_string()))
    }
}

/// Gateway errors that reconnecting cannot fix
fn is_fatal_gateway(err: &serenity::gateway::GatewayError) -> bool {
    use serenity::gateway::GatewayError;
    matches!(
        err,
        GatewayError::InvalidAuthentication
            | GatewayError::InvalidGatewayIntents
            | GatewayError::DisallowedGatewayIntents
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_must_be_positive_integers() {
        assert_eq!(parse_snowflake("1234").unwrap(), 1234);
        assert_eq!(parse_snowflake(" 42 ").unwrap(), 42);
        assert!(parse_snowflake("0").is_err());
        assert!(parse_snowflake("console").is_err());
        assert!(parse_snowflake("").is_err());
    }
}
