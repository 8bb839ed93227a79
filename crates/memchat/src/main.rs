//! memchat: persistent-memory chat CLI
//!
//! Resumes (or creates) a durable session for the configured user, then runs
//! an interactive loop that forwards each input line to the LLM-backed agent.
//! Type 'exit' or 'quit' to end the conversation.

mod chat;

use std::sync::{Arc, Mutex};

use memchat_core::{AgentRunner, Config, LlmClient, Resolution, SessionStore, resolve_session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting memchat...");
    tracing::info!("Model: {}", config.llm.model);

    // Open the persistent session store
    let store = SessionStore::new(&config.db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open session store: {}", e))?;

    // Find or create the session for this user
    let (session, resolution) = resolve_session(
        &store,
        &config.app_name,
        &config.user_id,
        memchat_core::config::initial_state(),
    )?;

    match resolution {
        Resolution::Resumed => println!("Continuing existing session: {}", session.id),
        Resolution::Created => println!("Created new session: {}", session.id),
    }

    // Wire up the agent
    let client = LlmClient::new(&config.llm)
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    let agent = AgentRunner::new(client, Arc::new(Mutex::new(store)));

    print_welcome();

    let lines = chat::spawn_stdin_reader();
    chat::run_chat(lines, &agent, &config.user_id, &session.id).await?;

    Ok(())
}

/// Print welcome message
fn print_welcome() {
    println!();
    println!("Welcome to Memory Agent Chat!");
    println!("Your reminders are remembered across runs.");
    println!("Type 'exit' or 'quit' to end the conversation.");
    println!();
}
