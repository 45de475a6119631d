//! HTTP surface for the session store and route guard.
//!
//! ## Endpoints
//!
//! ### Health & Info
//! - `GET /health` - Health check
//! - `GET /api/v1/` - API information
//!
//! ### Session
//! - `GET /api/v1/session` - Current authentication state
//! - `POST /api/v1/session/login` - Validate the login form and log in
//! - `POST /api/v1/session/logout` - Log out
//! - `POST /api/v1/signup` - Validate the sign-up form
//!
//! ### Navigation
//! - `GET /api/v1/guard?path=...` - Guard decision for a path
//! - `GET /<any route>` - Page navigation through the route guard
//!
//! ## Example
//!
//! ```no_run
//! use grocefy::api::{ServerConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> grocefy::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 3000);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use types::{
    ErrorResponse, GuardQuery, GuardResponse, LoginRequest, LoginResponse, SignupResponse,
};
