//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Cache: In-memory response cache
//! - LLM: Completion backend client
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod cache;
pub mod llm;
pub mod adapters;
