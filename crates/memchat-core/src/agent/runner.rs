//! LLM-backed agent runner

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::agent::AgentInvoker;
use crate::llm::{LlmClient, Message, MessagesRequest};
use crate::session::{Session, SessionService, SessionStore};
use crate::{Error, Result};

const MAX_TOKENS: u32 = 4096;

/// Runs one conversation turn per invocation: load session, append the user
/// message, call the LLM, print the reply, persist the turn.
pub struct AgentRunner {
    client: LlmClient,
    store: Arc<Mutex<SessionStore>>,
}

impl AgentRunner {
    /// Create a new agent runner
    pub fn new(client: LlmClient, store: Arc<Mutex<SessionStore>>) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl AgentInvoker for AgentRunner {
    async fn invoke(&self, user_id: &str, session_id: &str, text: &str) -> Result<()> {
        debug!("Dispatching turn for user {} session {}", user_id, session_id);

        // Lock is not held across the await below
        let mut session = {
            let store = self.store.lock().unwrap();
            store
                .load(session_id)?
                .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?
        };

        session.add_message(Message::user(text));

        let request = MessagesRequest {
            model: self.client.model().to_string(),
            max_tokens: MAX_TOKENS,
            system: Some(system_prompt(&session)),
            messages: session.messages.clone(),
        };

        let response = self.client.messages(request).await?;
        let reply = response.text();

        println!("Agent: {}", reply);

        session.add_message(Message::assistant(&reply));
        let store = self.store.lock().unwrap();
        store.save(&session)?;

        Ok(())
    }
}

/// Build the system prompt carrying the session state
fn system_prompt(session: &Session) -> String {
    let user_name = session
        .state
        .get("user_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    let reminders = session
        .state
        .get("reminders")
        .cloned()
        .unwrap_or_else(|| serde_json::json!([]));

    format!(
        "You are a helpful assistant with persistent memory of the user.\n\
         The user's name is: {}\n\
         Current reminders: {}",
        user_name, reminders
    )
}
