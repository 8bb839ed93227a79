//! Configuration management
//!
//! Configuration is resolved in the following order:
//! 1. Environment variables (a `.env` file is loaded by the binary first)
//! 2. Default values
//!
//! The application name, user identifier, database path and initial session
//! state all live here rather than as literals at the call sites, so the
//! resolver and chat loop can be exercised with alternative identities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Error;

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: None,
        }
    }
}

/// Main configuration for memchat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name sessions are keyed under
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User identifier sessions are keyed under
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Path to the SQLite database file backing the session store
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            user_id: default_user_id(),
            db_path: default_db_path(),
            llm: LlmConfig::default(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_app_name() -> String {
    "memory-agent".to_string()
}

fn default_user_id() -> String {
    "beataiagent".to_string()
}

fn default_db_path() -> String {
    "my_agent_data.db".to_string()
}

/// Seed state for a freshly created session: a user-name placeholder and an
/// empty reminder list. Ignored once a session already exists.
pub fn initial_state() -> Map<String, Value> {
    let mut state = Map::new();
    state.insert("user_name".to_string(), json!("YOUR NAME"));
    state.insert("reminders".to_string(), json!([]));
    state
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        // Get API key from either LLM_API_KEY or CLAUDE_API_KEY
        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("CLAUDE_API_KEY"))
            .map_err(|_| Error::Config("LLM_API_KEY or CLAUDE_API_KEY not set".to_string()))?;

        // Get model from either LLM_MODEL or CLAUDE_MODEL
        let model = std::env::var("LLM_MODEL")
            .or_else(|_| std::env::var("CLAUDE_MODEL"))
            .unwrap_or_else(|_| default_model());

        // Base URL for custom endpoints
        let base_url = std::env::var("LLM_BASE_URL").ok();

        Ok(Config {
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
            user_id: std::env::var("USER_ID").unwrap_or_else(|_| default_user_id()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| default_db_path()),
            llm: LlmConfig {
                api_key,
                model,
                base_url,
            },
        })
    }
}
