use std::sync::Arc;

use crate::application::errors::BackendError;
use crate::domain::entities::ConversationTurn;
use crate::infrastructure::llm::{LLMConfig, LLMError, LLMMessage, LLM};

impl From<LLMError> for BackendError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::MissingApiKey => BackendError::Misconfigured(err.to_string()),
            LLMError::RateLimited => BackendError::RateLimited,
            LLMError::ParseError(msg) => BackendError::Malformed(msg),
            LLMError::ApiError(msg) | LLMError::NetworkError(msg) => BackendError::Request(msg),
        }
    }
}

/// Fixed model and sampling settings applied to every completion
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl From<&LLMConfig> for CompletionSettings {
    fn from(config: &LLMConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Thin request/response wrapper over the completion backend. No retries.
pub struct CompletionService {
    llm: Arc<dyn LLM>,
    settings: CompletionSettings,
}

impl CompletionService {
    pub fn new(llm: Arc<dyn LLM>, settings: CompletionSettings) -> Self {
        Self { llm, settings }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub async fn complete(&self, turns: &[ConversationTurn]) -> Result<String, BackendError> {
        let messages: Vec<LLMMessage> = turns.iter().map(LLMMessage::from).collect();

        tracing::debug!(
            "Requesting completion from {} ({}) with {} turns",
            self.llm.name(),
            self.settings.model,
            messages.len()
        );

        let response = self.llm
            .chat(
                messages,
                Some(&self.settings.model),
                self.settings.temperature,
                self.settings.max_tokens,
            )
            .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!("Completion used {:?} tokens", usage.total_tokens);
        }

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{LLMResponse, LLMResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        seen: Mutex<Vec<(Vec<LLMMessage>, Option<String>)>>,
        reply: fn() -> LLMResult<LLMResponse>,
    }

    #[async_trait]
    impl LLM for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn chat(
            &self,
            messages: Vec<LLMMessage>,
            model: Option<&str>,
            _temperature: Option<f32>,
            _max_tokens: Option<u32>,
        ) -> LLMResult<LLMResponse> {
            self.seen.lock().unwrap().push((messages, model.map(str::to_string)));
            (self.reply)()
        }
    }

    fn settings() -> CompletionSettings {
        CompletionSettings {
            model: "gpt-3.5-turbo".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn sends_turns_with_fixed_model() {
        let llm = Arc::new(Scripted {
            seen: Mutex::new(Vec::new()),
            reply: || Ok(LLMResponse {
                content: "Sure!".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                usage: None,
                finish_reason: None,
            }),
        });
        let service = CompletionService::new(llm.clone(), settings());

        let turns = vec![ConversationTurn::system("persona"), ConversationTurn::user("hello")];
        let reply = service.complete(&turns).await.unwrap();
        assert_eq!(reply, "Sure!");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec![LLMMessage::system("persona"), LLMMessage::user("hello")]);
        assert_eq!(seen[0].1.as_deref(), Some("gpt-3.5-turbo"));
    }

    #[tokio::test]
    async fn malformed_payload_becomes_backend_error() {
        let llm = Arc::new(Scripted {
            seen: Mutex::new(Vec::new()),
            reply: || Err(LLMError::ParseError("No choices in response".to_string())),
        });
        let service = CompletionService::new(llm, settings());

        let err = service.complete(&[ConversationTurn::system("p")]).await.unwrap_err();
        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[test]
    fn llm_errors_map_to_backend_errors() {
        assert!(matches!(BackendError::from(LLMError::RateLimited), BackendError::RateLimited));
        assert!(matches!(
            BackendError::from(LLMError::NetworkError("timeout".into())),
            BackendError::Request(_)
        ));
        assert!(matches!(
            BackendError::from(LLMError::MissingApiKey),
            BackendError::Misconfigured(_)
        ));
    }
}
