use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::{Context, EventHandler};

use crate::application::messaging::MessageRouter;

use super::to_domain;

/// Serenity event handler wired to the message router.
pub struct DiscordHandler {
    router: Arc<MessageRouter>,
}

impl DiscordHandler {
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            "Bot is running as {} (listening on channel {})",
            ready.user.name,
            self.router.target_channel_id()
        );
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let message = to_domain(&msg);
        let router = Arc::clone(&self.router);

        // One task per message; slow completions must not hold up the gateway.
        tokio::spawn(async move {
            let outcome = router.handle(message).await;
            tracing::debug!("Message {} handled: {:?}", msg.id, outcome);
        });
    }
}
