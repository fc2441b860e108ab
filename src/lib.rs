//! relay-bot - answers one chat channel with commands or LLM completions

pub mod domain;
pub mod application;
pub mod infrastructure;
