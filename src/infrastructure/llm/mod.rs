//! LLM integration - OpenAI-compatible completion backend

pub mod traits;
pub mod config;
pub mod providers;

#[cfg(test)]
mod tests;

pub use traits::{LLM, LLMMessage, LLMResponse, LLMError, LLMResult, LLMUsage};
pub use config::LLMConfig;
pub use providers::OpenAIProvider;
