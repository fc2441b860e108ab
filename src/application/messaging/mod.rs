//! Message handling - Event-driven message processing

pub mod parser;
pub mod router;

pub use parser::{MessageParser, ParsedInput};
pub use router::{MessageRouter, Outcome, Route};
