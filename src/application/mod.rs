//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: context building, completion, command dispatch
//! - Commands: built-in command handlers
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and routing

pub mod errors;
pub mod services;
pub mod commands;
pub mod messaging;
