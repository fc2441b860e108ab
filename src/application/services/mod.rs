//! Application services - Business logic orchestration

pub mod command_service;
pub mod completion_service;
pub mod context_builder;

pub use command_service::{CommandService, COMMAND_FAILURE_REPLY};
pub use completion_service::{CompletionService, CompletionSettings};
pub use context_builder::ContextBuilder;
