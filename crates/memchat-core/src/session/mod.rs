//! Session management module
//!
//! Provides durable session records keyed by (app_name, user_id) and the
//! resume-or-create resolution used at startup.

mod resolver;
mod store;
mod types;

pub use resolver::{Resolution, resolve_session};
pub use store::{SessionService, SessionStore};
pub use types::Session;
