use clap::{Parser, Subcommand};
use std::sync::Arc;

use relay_bot::application::commands;
use relay_bot::application::errors::BotError;
use relay_bot::application::messaging::{MessageParser, MessageRouter};
use relay_bot::application::services::{CompletionService, CompletionSettings, ContextBuilder};
use relay_bot::domain::entities::CommandRegistry;
use relay_bot::application::errors::ConfigError;
use relay_bot::domain::traits::{Channel, ResponseCache};
use relay_bot::infrastructure::adapters::console::{ConsoleAdapter, CONSOLE_CHANNEL};
use relay_bot::infrastructure::adapters::discord::{DiscordAdapter, DiscordChannel};
use relay_bot::infrastructure::cache::LruCache;
use relay_bot::infrastructure::config::Config;
use relay_bot::infrastructure::llm::{OpenAIProvider, LLM};

#[derive(Parser)]
#[command(name = "relay-bot")]
#[command(about = "A chat relay bot answering one channel with LLM completions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and start relaying
    Run,
    /// Chat with the bot on stdin (dev mode)
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config),
        Commands::Console => run_console(&cli.config),
        Commands::Version => {
            println!("relay-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// File config when present, environment on top. A file that is present but
/// unreadable or malformed is an error.
fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        tracing::info!("No config file at {}, using defaults", config_path);
        Config::default()
    };

    Ok(config.with_env())
}

fn build_router(config: &Config, channel: Arc<dyn Channel>, target_channel_id: &str) -> Arc<MessageRouter> {
    let mut registry = CommandRegistry::new();
    commands::register_defaults(&mut registry, &config.bot.prefix);
    tracing::info!("Registered {} commands", registry.len());

    let api_key = config.llm.api_key.clone().unwrap_or_default();
    let llm: Arc<dyn LLM> = Arc::new(
        OpenAIProvider::new(api_key, Some(config.llm.model.as_str())).with_base_url(&config.llm.base_url),
    );
    let completion = CompletionService::new(llm, CompletionSettings::from(&config.llm));
    tracing::info!("Using {} for AI responses", completion.model());

    let cache: Arc<dyn ResponseCache> = Arc::new(LruCache::new(config.cache.capacity));

    Arc::new(MessageRouter::new(
        channel,
        Arc::new(registry),
        cache,
        Arc::new(completion),
        ContextBuilder::new(&config.bot.persona, &config.bot.prefix, config.bot.history_limit),
        MessageParser::new(),
        target_channel_id,
    ))
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    config.validate()?;

    tracing::info!("Starting {}", config.bot.name);

    let token = config.discord.token.clone().unwrap_or_default();
    let target = config.discord.channel_id.clone().unwrap_or_default();

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async {
        let channel = DiscordChannel::new(Arc::new(serenity::http::Http::new(&token)));
        match channel.fetch_bot_info().await {
            Ok(me) => tracing::info!("Authenticated as {} ({})", me.name, me.id),
            Err(e) => tracing::warn!("Failed to fetch bot info: {}", e),
        }

        let router = build_router(&config, Arc::new(channel), &target);
        DiscordAdapter::new(token, router).run().await
    })
}

fn run_console(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    config.validate_bot()?;

    if config.llm.api_key.is_none() {
        tracing::warn!("API_KEY not set, chat replies will fail; commands still work");
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async {
        let console = Arc::new(ConsoleAdapter::new());
        let router = build_router(&config, console.clone(), CONSOLE_CHANNEL);

        tracing::info!("Bot is running! Type a message, {}help for commands, Ctrl-D to quit", config.bot.prefix);

        while let Some(input) = console.read_line("> ").await {
            if input.trim().is_empty() {
                continue;
            }
            let message = console.receive(input).await;
            router.handle(message).await;
        }
        Ok(())
    })
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
