use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandContext};

/// Reply sent when a handler fails
pub const COMMAND_FAILURE_REPLY: &str = "There was an error trying to execute that command!";

/// Service for executing commands with failure isolation
pub struct CommandService;

impl CommandService {
    /// Run a command's handler. Errors and panics stop here: they are logged and
    /// answered with a generic failure reply, never propagated.
    pub async fn dispatch(command: Arc<Command>, ctx: CommandContext) -> Result<(), CommandError> {
        let handler = Arc::clone(&command.handler);
        let task_ctx = ctx.clone();

        let result = match tokio::spawn(async move { handler.execute(task_ctx).await }).await {
            Ok(result) => result,
            Err(join_err) => Err(CommandError::Panicked(join_err.to_string())),
        };

        if let Err(e) = &result {
            tracing::error!(
                "Command '{}' failed for {} in {}: {:?}",
                command.name,
                ctx.message.author.id,
                ctx.message.channel_id,
                e
            );
            if let Err(send_err) = ctx.channel.reply(&ctx.message, COMMAND_FAILURE_REPLY).await {
                tracing::error!("Failed to send command failure reply: {}", send_err);
            }
        }

        result
    }
}
