//! Interactive chat loop
//!
//! Standard input is read on a dedicated thread and handed to the async loop
//! over a channel, so the blocking read never stalls the tokio scheduler.
//! The loop itself alternates between waiting for a line and awaiting the
//! agent call; one turn is in flight at a time.

use std::io::Write;

use memchat_core::AgentInvoker;
use tokio::sync::mpsc;

/// Check whether a line is one of the reserved exit keywords
fn is_sentinel(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

/// Spawn the blocking stdin reader thread.
///
/// Sends each line (newline stripped) over the returned channel. The channel
/// closes on stdin EOF or once the receiving loop is dropped.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        loop {
            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

/// Run the interactive loop until a sentinel line or end of input.
///
/// Every non-sentinel line, including empty ones, is forwarded verbatim to
/// the agent. Agent failures propagate and end the process.
pub async fn run_chat(
    mut lines: mpsc::Receiver<String>,
    agent: &dyn AgentInvoker,
    user_id: &str,
    session_id: &str,
) -> anyhow::Result<()> {
    loop {
        // Prompt only once the previous turn has completed
        print!("You: ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.recv().await else {
            break;
        };

        if is_sentinel(&line) {
            println!("Ending conversation. Your data has been saved to the database.");
            break;
        }

        agent.invoke(user_id, session_id, &line).await?;
    }

    Ok(())
}
