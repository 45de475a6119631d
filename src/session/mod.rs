//! Session management module.
//!
//! This module holds the single logged-in user, mirrors it to durable
//! storage, and tracks the logging-out window used by the route guard.

mod state;
mod store;
mod user;

pub use state::LogoutPhase;
pub use store::{AuthSnapshot, SessionStore, StoreConfig, DEFAULT_LOGOUT_WINDOW, STORAGE_KEY};
pub use user::{Credentials, SessionUser, FALLBACK_NAME};
