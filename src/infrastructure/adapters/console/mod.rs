//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::{Mutex, RwLock};
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Channel, BotInfo};
use crate::application::errors::BotError;

/// Channel id every console message lives in
pub const CONSOLE_CHANNEL: &str = "console";

/// Console bot adapter for local development.
///
/// Keeps the channel history in memory, oldest first, so context building
/// behaves as it would against a real channel.
pub struct ConsoleAdapter {
    info: BotInfo,
    user: User,
    history: RwLock<Vec<Message>>,
    stdin: Mutex<BufReader<Stdin>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console-bot".to_string(),
                name: "relay-bot".to_string(),
            },
            user: User::new("console-user").with_name("you"),
            history: RwLock::new(Vec::new()),
            stdin: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    /// Record a line typed by the local user and return it as a channel message
    pub async fn receive(&self, text: impl Into<String>) -> Message {
        let message = Message::new(CONSOLE_CHANNEL, self.user.clone(), text);
        self.history.write().await.push(message.clone());
        message
    }

    /// Append an arbitrary message to the history
    pub async fn push(&self, message: Message) {
        self.history.write().await.push(message);
    }

    pub async fn history(&self) -> Vec<Message> {
        self.history.read().await.clone()
    }

    /// Prompt and read one line from stdin; `None` on EOF
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await.ok()?;
        stdout.flush().await.ok()?;

        let mut input = String::new();
        let read = self.stdin.lock().await.read_line(&mut input).await.ok()?;
        if read == 0 {
            return None;
        }
        Some(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for ConsoleAdapter {
    async fn send_typing(&self, _channel_id: &str) -> Result<(), BotError> {
        println!("[BOT] ...");
        Ok(())
    }

    async fn reply(&self, _to: &Message, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        let bot = User::bot(self.info.id.clone()).with_name(self.info.name.clone());
        let reply = Message::new(CONSOLE_CHANNEL, bot, text);
        let id = reply.id.clone();
        self.history.write().await.push(reply);
        Ok(id)
    }

    async fn fetch_recent(&self, channel_id: &str, limit: usize) -> Result<Vec<Message>, BotError> {
        let history = self.history.read().await;
        Ok(history
            .iter()
            .rev()
            .filter(|m| m.channel_id == channel_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
