//! Built-in command handlers

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandContext, CommandHandler, CommandRegistry};

/// Replies "Pong!"
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError> {
        ctx.reply("Pong!").await
    }
}

/// Lists the commands known when it was registered
pub struct HelpCommand {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl HelpCommand {
    fn from_registry(registry: &CommandRegistry, prefix: &str) -> Self {
        let mut entries: Vec<(String, String)> = registry
            .all()
            .map(|cmd| (cmd.name.to_lowercase(), cmd.description.clone().unwrap_or_default()))
            .collect();
        entries.push(("help".to_string(), "Show this message".to_string()));

        Self {
            prefix: prefix.to_string(),
            entries,
        }
    }

    fn line(&self, name: &str, description: &str) -> String {
        format!("{}{} - {}", self.prefix, name, description)
    }

    pub fn listing(&self) -> String {
        let mut help = "Available commands:".to_string();
        for (name, description) in &self.entries {
            help.push_str("\n  ");
            help.push_str(&self.line(name, description));
        }
        help
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError> {
        let Some(topic) = ctx.args.first() else {
            return ctx.reply(&self.listing()).await;
        };

        let topic = topic.trim_start_matches(self.prefix.as_str()).to_lowercase();
        match self.entries.iter().find(|(name, _)| *name == topic) {
            Some((name, description)) => ctx.reply(&self.line(name, description)).await,
            None => ctx.reply(&format!("Command {}{} not found", self.prefix, topic)).await,
        }
    }
}

/// Register `ping`, then `help` listing everything registered so far.
/// Call after all other commands are in the registry.
pub fn register_defaults(registry: &mut CommandRegistry, prefix: &str) {
    registry.register(Command::new("ping", PingCommand)
        .with_description("Check the bot is alive"));

    let help = HelpCommand::from_registry(registry, prefix);
    registry.register(Command::new("help", help)
        .with_description("Show this message")
        .with_aliases(vec!["commands".to_string()]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_registered() {
        let mut registry = CommandRegistry::new();
        register_defaults(&mut registry, "!");

        assert!(registry.lookup("ping").is_some());
        assert!(registry.lookup("HELP").is_some());
        assert!(registry.lookup("commands").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn listing_includes_every_command_once() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("Roll", PingCommand).with_description("Roll dice"));
        let help = HelpCommand::from_registry(&registry, "!");

        assert_eq!(
            help.listing(),
            "Available commands:\n  !roll - Roll dice\n  !help - Show this message"
        );
    }
}
