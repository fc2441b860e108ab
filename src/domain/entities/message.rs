use super::User;
use chrono::{DateTime, Utc};

/// A message as received from the chat transport
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: User,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            author,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the text starts with the given command prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.content.starts_with(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_detection() {
        let msg = Message::new("c1", User::new("u1"), "!ping");
        assert!(msg.has_prefix("!"));
        assert!(!msg.has_prefix("/"));
        assert!(!msg.has_prefix(""));
    }
}
