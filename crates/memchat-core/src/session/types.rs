//! Session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::llm::Message;

/// A durable conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Application name this session belongs to
    pub app_name: String,
    /// User this session belongs to
    pub user_id: String,
    /// Mutable session state (user name, reminders, ...); the internal
    /// shape is owned by the agent, not by this program
    pub state: Map<String, Value>,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Session creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with the given seed state
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        state: Map<String, Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            state,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the session
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Get message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if session has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::initial_state;

    #[test]
    fn test_session_creation() {
        let session = Session::new("memory-agent", "user-1", initial_state());
        assert!(!session.id.is_empty());
        assert_eq!(session.app_name, "memory-agent");
        assert_eq!(session.user_id, "user-1");
        assert!(session.is_empty());
        assert!(session.state.contains_key("user_name"));
        assert!(session.state.contains_key("reminders"));
    }

    #[test]
    fn test_add_message() {
        let mut session = Session::new("memory-agent", "user-1", Map::new());
        session.add_message(Message::user("Hello"));
        assert_eq!(session.message_count(), 1);
        assert!(session.updated_at >= session.created_at);
    }
}
