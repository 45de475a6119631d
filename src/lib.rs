//! # grocefy
//!
//! Session store and route guard for the Grocefy household grocery tracker.
//!
//! The crate keeps the single logged-in user, mirrors it to durable
//! storage so it survives a restart, and decides for every navigation
//! whether a protected view is rendered or the visitor is sent to the login
//! view.
//!
//! ## Features
//!
//! - **Session store**: one optional user, hydrated from storage on open
//! - **Logging-out window**: redirects are suppressed briefly after logout
//! - **Route guard**: render-or-redirect decisions for protected views
//! - **HTTP surface**: axum endpoints for a front-end to drive the above
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use grocefy::{Credentials, FileStorage, RouteGuard, SessionStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> grocefy::Result<()> {
//!     grocefy::logging::try_init().ok();
//!
//!     let storage = Arc::new(FileStorage::open(".grocefy")?);
//!     let store = SessionStore::open(storage, StoreConfig::default());
//!     let guard = RouteGuard::default();
//!
//!     store.login(Credentials::new("asha@example.com"));
//!     assert!(guard.check(&store, "/lists").is_render());
//!
//!     store.logout();
//!     // Still rendered while protected views unmount
//!     assert!(guard.check(&store, "/lists").is_render());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod logging;
pub mod routes;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use error::{GrocefyError, Result};
pub use forms::{FormErrors, LoginForm, SignupForm};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use routes::{resolve, RouteMatch, View};
pub use session::{AuthSnapshot, Credentials, SessionStore, SessionUser, StoreConfig};
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
