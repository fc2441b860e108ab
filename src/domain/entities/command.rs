use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;
use crate::domain::traits::Channel;

/// Everything a handler needs to act on an invocation
#[derive(Clone)]
pub struct CommandContext {
    pub message: Message,
    pub args: Vec<String>,
    pub channel: Arc<dyn Channel>,
}

impl CommandContext {
    /// Reply to the invoking message
    pub async fn reply(&self, text: &str) -> Result<(), CommandError> {
        self.channel
            .reply(&self.message, text)
            .await
            .map(|_| ())
            .map_err(|e| CommandError::ExecutionFailed(e.to_string()))
    }
}

/// Command handler - replies through its own side effects on the channel
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError>;
}

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new<H>(name: impl Into<String>, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Command registry for managing available commands.
///
/// Built once at startup and then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and aliases. A later registration wins.
    pub fn register(&mut self, command: Command) {
        let slot = self.commands.len();
        let keys: Vec<String> = std::iter::once(&command.name)
            .chain(command.aliases.iter())
            .map(|k| k.to_lowercase())
            .collect();

        for key in keys {
            if self.index.insert(key.clone(), slot).is_some() {
                tracing::warn!("Command name '{}' registered twice, replacing", key);
            }
        }
        self.commands.push(Arc::new(command));
    }

    /// Case-insensitive lookup by name or alias
    pub fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&slot| self.commands.get(slot))
            .cloned()
    }

    /// Commands in registration order, skipping ones fully shadowed by later registrations
    pub fn all(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(slot, _)| self.index.values().any(|s| s == slot))
            .map(|(_, cmd)| cmd)
    }

    pub fn len(&self) -> usize {
        self.all().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
