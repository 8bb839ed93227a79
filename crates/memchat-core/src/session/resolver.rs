//! Resume-or-create session resolution
//!
//! Runs once at startup: if any session exists for (app_name, user_id) the
//! most recent one is reused, otherwise a new session is created with the
//! seed state. At most one session is ever in use per run, and an existing
//! session is never shadowed by a new one.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::Result;
use crate::session::{Session, SessionService};

/// How the session was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An existing session was found and reused
    Resumed,
    /// No session existed; a new one was created with the seed state
    Created,
}

/// Produce the single session to use for this run.
///
/// Store failures propagate unchanged; there is no retry here, a failing
/// store aborts startup.
pub fn resolve_session<S: SessionService + ?Sized>(
    store: &S,
    app_name: &str,
    user_id: &str,
    initial_state: Map<String, Value>,
) -> Result<(Session, Resolution)> {
    let sessions = store.list_sessions(app_name, user_id)?;

    // Index 0 is the most recent; ordering is guaranteed by the store
    if let Some(session) = sessions.into_iter().next() {
        debug!("Resuming session {} for user {}", session.id, user_id);
        return Ok((session, Resolution::Resumed));
    }

    info!("No session found for user {}, creating one", user_id);
    let session = store.create_session(app_name, user_id, initial_state)?;
    Ok((session, Resolution::Created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::initial_state;
    use crate::session::SessionStore;

    #[test]
    fn test_creates_when_none_exist() {
        let store = SessionStore::in_memory().unwrap();

        let (session, resolution) =
            resolve_session(&store, "memory-agent", "user-1", initial_state()).unwrap();

        assert_eq!(resolution, Resolution::Created);
        assert_eq!(
            session.state.get("user_name"),
            Some(&serde_json::json!("YOUR NAME"))
        );
        // Exactly one session was persisted
        let sessions = store.list_sessions("memory-agent", "user-1").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, session.id);
    }

    #[test]
    fn test_resumes_existing() {
        let store = SessionStore::in_memory().unwrap();
        let existing = store
            .create_session("memory-agent", "user-1", initial_state())
            .unwrap();

        let (session, resolution) =
            resolve_session(&store, "memory-agent", "user-1", initial_state()).unwrap();

        assert_eq!(resolution, Resolution::Resumed);
        assert_eq!(session.id, existing.id);
        // No duplicate was created
        let sessions = store.list_sessions("memory-agent", "user-1").unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_consecutive_runs_reuse_same_session() {
        let store = SessionStore::in_memory().unwrap();

        let (first, _) =
            resolve_session(&store, "memory-agent", "user-1", initial_state()).unwrap();
        let (second, resolution) =
            resolve_session(&store, "memory-agent", "user-1", initial_state()).unwrap();

        assert_eq!(resolution, Resolution::Resumed);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_users_get_separate_sessions() {
        let store = SessionStore::in_memory().unwrap();

        let (a, _) = resolve_session(&store, "memory-agent", "user-a", initial_state()).unwrap();
        let (b, _) = resolve_session(&store, "memory-agent", "user-b", initial_state()).unwrap();

        assert_ne!(a.id, b.id);
    }
}
