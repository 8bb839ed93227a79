//! Agent invocation
//!
//! The chat loop talks to the agent through the [`AgentInvoker`] seam; the
//! production implementation is [`AgentRunner`], which delegates each turn to
//! the LLM API and persists the conversation in the session store.

mod runner;

use async_trait::async_trait;

use crate::Result;

pub use runner::AgentRunner;

/// A delegated conversational agent.
///
/// The invoker prints the agent's response itself; callers consume no return
/// value beyond success or failure.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, user_id: &str, session_id: &str, text: &str) -> Result<()>;
}
