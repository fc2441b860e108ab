//! Platform adapters - chat transports implementing `Channel`

pub mod console;
pub mod discord;
