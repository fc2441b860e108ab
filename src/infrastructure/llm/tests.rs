//! Integration tests for LLM providers

use crate::domain::entities::ConversationTurn;
use crate::infrastructure::llm::{LLM, LLMMessage, OpenAIProvider, LLMConfig};
use crate::infrastructure::llm::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[tokio::test]
#[ignore] // Requires API_KEY environment variable
async fn test_openai_chat() {
    let config = LLMConfig::from_env();
    let api_key = config.api_key.expect("API_KEY not set");

    let provider = OpenAIProvider::new(api_key, Some(&config.model))
        .with_base_url(config.base_url);

    let messages = vec![
        LLMMessage::system("You are a friendly Chatbot."),
        LLMMessage::user("What is 2+2?"),
    ];

    let response = provider.chat(messages, None, Some(0.7), Some(100))
        .await
        .expect("Chat request failed");

    println!("Response: {}", response.content);
    println!("Model: {}", response.model);

    assert!(!response.content.is_empty());
}

#[test]
fn test_llm_config_overrides() {
    let mut config = LLMConfig::default();
    config.apply_overrides(|key| match key {
        "OPENAI_API_KEY" => Some("sk-fallback".to_string()),
        "LLM_MODEL" => Some("gpt-4o-mini".to_string()),
        "LLM_TEMPERATURE" => Some("not-a-number".to_string()),
        _ => None,
    });

    assert_eq!(config.api_key.as_deref(), Some("sk-fallback"));
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.temperature, None);
}

#[test]
fn test_api_key_wins_over_openai_fallback() {
    let mut config = LLMConfig::default();
    config.apply_overrides(|key| match key {
        "API_KEY" => Some("sk-primary".to_string()),
        "OPENAI_API_KEY" => Some("sk-fallback".to_string()),
        "LLM_TEMPERATURE" => Some("0.2".to_string()),
        _ => None,
    });

    assert_eq!(config.api_key.as_deref(), Some("sk-primary"));
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.temperature, Some(0.2));
}

#[test]
fn test_llm_message_from_turn() {
    let msg = LLMMessage::from(&ConversationTurn::user("Hello"));
    assert_eq!(msg, LLMMessage::user("Hello"));

    let system_msg = LLMMessage::from(&ConversationTurn::system("You are helpful."));
    assert_eq!(system_msg.role, "system");
    assert_eq!(system_msg.content, "You are helpful.");
}
