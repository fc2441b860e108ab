//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Message, ConversationTurn, Command)
//! - Traits: Abstractions for infrastructure (Channel, ResponseCache)

pub mod entities;
pub mod traits;
