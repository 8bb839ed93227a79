//! Session persistence using SQLite

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Row, params};
use serde_json::{Map, Value};

use crate::llm::Message;
use crate::session::Session;
use crate::{Error, Result};

/// Abstract session store interface, so the resolver and agent runner can be
/// exercised against a test double.
pub trait SessionService {
    /// List sessions for (app_name, user_id), most recently created first
    fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>>;

    /// Create and persist a new session seeded with the given state
    fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Map<String, Value>,
    ) -> Result<Session>;

    /// Load a session by ID
    fn load(&self, id: &str) -> Result<Option<Session>>;

    /// Persist a session
    fn save(&self, session: &Session) -> Result<()>;
}

/// SQLite-based session store
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Create a new session store with the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory session store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                app_name TEXT NOT NULL,
                user_id TEXT NOT NULL,
                state TEXT NOT NULL,
                messages TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // Create index for (app_name, user_id) queries
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_app_user
             ON sessions(app_name, user_id)",
            [],
        )?;

        Ok(())
    }

    fn row_to_session(row: &Row<'_>) -> rusqlite::Result<Session> {
        let state_json: String = row.get(3)?;
        let state: Map<String, Value> =
            serde_json::from_str(&state_json).map_err(|_| rusqlite::Error::InvalidQuery)?;

        let messages_json: String = row.get(4)?;
        let messages: Vec<Message> =
            serde_json::from_str(&messages_json).map_err(|_| rusqlite::Error::InvalidQuery)?;

        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| rusqlite::Error::InvalidQuery)?
            .with_timezone(&Utc);

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|_| rusqlite::Error::InvalidQuery)?
            .with_timezone(&Utc);

        Ok(Session {
            id: row.get(0)?,
            app_name: row.get(1)?,
            user_id: row.get(2)?,
            state,
            messages,
            created_at,
            updated_at,
        })
    }

    /// Fixed-width timestamp encoding so the TEXT column compares
    /// chronologically under ORDER BY
    fn encode_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl SessionService for SessionStore {
    fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, app_name, user_id, state, messages, created_at, updated_at
             FROM sessions
             WHERE app_name = ?1 AND user_id = ?2
             ORDER BY created_at DESC",
        )?;

        let sessions = stmt.query_map(params![app_name, user_id], Self::row_to_session)?;

        let mut result = Vec::new();
        for session in sessions {
            result.push(session?);
        }
        Ok(result)
    }

    fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Map<String, Value>,
    ) -> Result<Session> {
        let session = Session::new(app_name, user_id, state);
        self.save(&session)?;
        Ok(session)
    }

    fn load(&self, id: &str) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, app_name, user_id, state, messages, created_at, updated_at
             FROM sessions WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_session) {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let state_json = serde_json::to_string(&session.state)?;
        let messages_json = serde_json::to_string(&session.messages)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO sessions
             (id, app_name, user_id, state, messages, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.app_name,
                session.user_id,
                state_json,
                messages_json,
                Self::encode_timestamp(&session.created_at),
                Self::encode_timestamp(&session.updated_at),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::initial_state;
    use chrono::Duration;

    #[test]
    fn test_store_creation() {
        let store = SessionStore::in_memory().unwrap();
        assert!(store.list_sessions("memory-agent", "user-1").is_ok());
    }

    #[test]
    fn test_create_and_load() {
        let store = SessionStore::in_memory().unwrap();
        let session = store
            .create_session("memory-agent", "user-1", initial_state())
            .unwrap();

        let loaded = store.load(&session.id).unwrap();
        assert!(loaded.is_some());
        let loaded = loaded.unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(
            loaded.state.get("user_name"),
            Some(&serde_json::json!("YOUR NAME"))
        );
        assert_eq!(loaded.state.get("reminders"), Some(&serde_json::json!([])));
    }

    #[test]
    fn test_save_round_trips_messages() {
        let store = SessionStore::in_memory().unwrap();
        let mut session = store
            .create_session("memory-agent", "user-1", Map::new())
            .unwrap();

        session.add_message(Message::user("remind me to water the plants"));
        session.add_message(Message::assistant("Noted."));
        store.save(&session).unwrap();

        let loaded = store.load(&session.id).unwrap().unwrap();
        assert_eq!(loaded.message_count(), 2);
        assert_eq!(loaded.messages[0].content, "remind me to water the plants");
        assert_eq!(loaded.messages[1].role, "assistant");
    }

    #[test]
    fn test_list_filters_by_app_and_user() {
        let store = SessionStore::in_memory().unwrap();
        store
            .create_session("memory-agent", "user-1", Map::new())
            .unwrap();
        store
            .create_session("memory-agent", "user-2", Map::new())
            .unwrap();
        store
            .create_session("other-app", "user-1", Map::new())
            .unwrap();

        let sessions = store.list_sessions("memory-agent", "user-1").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].user_id, "user-1");
    }

    #[test]
    fn test_list_orders_newest_first() {
        let store = SessionStore::in_memory().unwrap();

        let old = Session::new("memory-agent", "user-1", Map::new());
        let mut new = Session::new("memory-agent", "user-1", Map::new());
        new.created_at = old.created_at + Duration::seconds(60);
        store.save(&old).unwrap();
        store.save(&new).unwrap();

        let sessions = store.list_sessions("memory-agent", "user-1").unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, new.id);
        assert_eq!(sessions[1].id, old.id);
    }

    #[test]
    fn test_persistence_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("sessions.db");
        let db_path = db_path.to_str().unwrap();

        let first_id = {
            let store = SessionStore::new(db_path).unwrap();
            store
                .create_session("memory-agent", "user-1", initial_state())
                .unwrap()
                .id
        };

        let store = SessionStore::new(db_path).unwrap();
        let sessions = store.list_sessions("memory-agent", "user-1").unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, first_id);
    }
}
