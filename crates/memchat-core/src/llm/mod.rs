//! LLM API client and types

mod client;
mod types;

pub use client::LlmClient;
pub use types::*;
