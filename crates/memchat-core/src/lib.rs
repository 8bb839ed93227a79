//! memchat-core: persistent-memory chat core library
//!
//! Provides the session store, resume-or-create session resolution,
//! the LLM client and the agent invocation seam used by the memchat binary.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;

pub use agent::{AgentInvoker, AgentRunner};
pub use config::{Config, LlmConfig};
pub use error::{Error, Result};
pub use llm::{LlmClient, Message};
pub use session::{Resolution, Session, SessionService, SessionStore, resolve_session};
