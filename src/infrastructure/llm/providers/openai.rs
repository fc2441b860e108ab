//! OpenAI Provider - chat completions over any OpenAI-compatible API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::infrastructure::llm::{LLMMessage, LLMResponse, LLMError, LLMResult, LLM, LLMUsage};

/// OpenAI provider
pub struct OpenAIProvider {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at another OpenAI-compatible API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get endpoint URL for chat completions
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<LLMMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in response
#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

/// Response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Usage information
#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Turn a decoded body into a response, rejecting payloads without a reply
fn into_response(body: ChatResponse, requested_model: &str) -> LLMResult<LLMResponse> {
    let choice = body.choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

    let content = choice.message
        .and_then(|m| m.content)
        .ok_or_else(|| LLMError::ParseError("Choice has no message content".to_string()))?;

    let usage = body.usage.map(|u| LLMUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(LLMResponse {
        content,
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
        usage,
        finish_reason: choice.finish_reason,
    })
}

/// Decode a raw response body
fn parse_body(body: &str, requested_model: &str) -> LLMResult<LLMResponse> {
    let decoded: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::ParseError(e.to_string()))?;
    into_response(decoded, requested_model)
}

#[async_trait]
impl LLM for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        if self.api_key.is_empty() {
            return Err(LLMError::MissingApiKey);
        }

        let model = model.unwrap_or(&self.model);

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self.client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        parse_body(&body, model)
    }
}
