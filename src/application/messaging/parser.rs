//! Message parser - Splits raw text into a candidate command and arguments

/// Result of parsing message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    /// Lower-cased first token, empty when the text has no tokens
    pub name: String,
    pub args: Vec<String>,
}

/// Parses incoming text into a candidate command invocation
#[derive(Debug, Default)]
pub struct MessageParser;

impl MessageParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse text as if it were a command.
    ///
    /// The first character is always dropped as the prefix position, whether or
    /// not it is the configured prefix. Whether the result names a command is up
    /// to the registry.
    pub fn parse(&self, text: &str) -> ParsedInput {
        let mut chars = text.chars();
        chars.next();
        let mut parts = chars.as_str().split_whitespace();

        let name = parts.next().unwrap_or("").to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();

        ParsedInput { name, args }
    }
}
