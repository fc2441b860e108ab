//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::infrastructure::cache::DEFAULT_CAPACITY;

/// Most messages a single history fetch may return
pub const MAX_HISTORY_LIMIT: usize = 100;
use crate::infrastructure::llm::LLMConfig;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
    pub llm: LLMConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Leading character marking a command invocation
    pub prefix: String,
    /// System instruction sent ahead of every conversation
    pub persona: String,
    /// How many recent channel messages feed the context
    pub history_limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscordConfig {
    pub token: Option<String>,
    /// The only channel the bot answers in
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "relay-bot".to_string(),
            prefix: "!".to_string(),
            persona: "You are a friendly Chatbot.".to_string(),
            history_limit: 15,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Override file values with environment variables
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN") {
            self.discord.token = Some(token);
        }

        if let Some(channel_id) = lookup("CHANNEL_ID") {
            self.discord.channel_id = Some(channel_id);
        }

        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        self.llm.apply_overrides(&lookup);
        self
    }

    /// Check everything the Discord runtime needs is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discord.token.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("TOKEN".to_string()));
        }
        if self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("API_KEY".to_string()));
        }
        if self.discord.channel_id.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("CHANNEL_ID".to_string()));
        }
        self.validate_bot()
    }

    /// Checks shared by every run mode
    pub fn validate_bot(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.chars().count() != 1 {
            return Err(ConfigError::InvalidValue(format!(
                "prefix must be a single character, got {:?}",
                self.bot.prefix
            )));
        }
        if self.bot.history_limit == 0 || self.bot.history_limit > MAX_HISTORY_LIMIT {
            return Err(ConfigError::InvalidValue(format!(
                "history-limit must be between 1 and {}, got {}",
                MAX_HISTORY_LIMIT, self.bot.history_limit
            )));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::InvalidValue("cache capacity must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_expected_behavior() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.persona, "You are a friendly Chatbot.");
        assert_eq!(config.bot.history_limit, 15);
        assert_eq!(config.cache.capacity, 500);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn env_overrides_fill_credentials() {
        let config = Config::default().with_overrides(lookup(&[
            ("TOKEN", "discord-token"),
            ("API_KEY", "sk-test"),
            ("CHANNEL_ID", "1234"),
        ]));

        assert_eq!(config.discord.token.as_deref(), Some("discord-token"));
        assert_eq!(config.discord.channel_id.as_deref(), Some("1234"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_token_is_reported_first() {
        let config = Config::default().with_overrides(lookup(&[("API_KEY", "sk-test")]));
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "TOKEN"),
            other => panic!("expected missing TOKEN, got {:?}", other),
        }
    }

    #[test]
    fn missing_channel_is_reported() {
        let config = Config::default()
            .with_overrides(lookup(&[("TOKEN", "t"), ("API_KEY", "k")]));
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "CHANNEL_ID"),
            other => panic!("expected missing CHANNEL_ID, got {:?}", other),
        }
    }

    #[test]
    fn multi_char_prefix_is_rejected() {
        let mut config = Config::default();
        config.bot.prefix = "!!".to_string();
        assert!(matches!(config.validate_bot(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn history_limit_must_fit_one_fetch() {
        let mut config = Config::default();
        config.bot.history_limit = MAX_HISTORY_LIMIT;
        assert!(config.validate_bot().is_ok());

        config.bot.history_limit = MAX_HISTORY_LIMIT + 1;
        assert!(matches!(config.validate_bot(), Err(ConfigError::InvalidValue(_))));

        config.bot.history_limit = 0;
        assert!(matches!(config.validate_bot(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = Config::from_yaml("bot:\n  history-limit: [not, a, number]\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unreadable_file_is_a_parse_error() {
        let result = Config::load("/nonexistent/relay-bot/config.yaml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
bot:
  persona: "You are a pirate."
discord:
  channel-id: "42"
cache:
  capacity: 10
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.bot.persona, "You are a pirate.");
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.discord.channel_id.as_deref(), Some("42"));
        assert_eq!(config.cache.capacity, 10);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[test]
    fn env_wins_over_file() {
        let config = Config::from_yaml("discord:\n  channel-id: \"1\"\n")
            .unwrap()
            .with_overrides(lookup(&[("CHANNEL_ID", "2")]));
        assert_eq!(config.discord.channel_id.as_deref(), Some("2"));
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("history-limit"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, "!");
    }
}
