//! Route guard for protected views.
//!
//! The guard is evaluated on every navigation to a protected route. It has
//! two outcomes: render the wrapped view, or redirect to the login view with
//! history replaced. While a logout is in flight the redirect is suppressed
//! so dependent views can unmount without flashing the login screen.

use serde::Serialize;

use crate::session::{AuthSnapshot, SessionStore};

/// Default login view path.
pub const LOGIN_PATH: &str = "/login";

/// Where a successful login lands when there is no usable return path.
pub const DEFAULT_HOME_PATH: &str = "/home";

/// Access state for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    /// The wrapped view is rendered.
    Allowed,
    /// The visitor is sent to the login view.
    Blocked,
}

/// Result of evaluating the guard for one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the wrapped view unchanged.
    Render,
    /// Navigate to the login view.
    Redirect {
        /// Target path.
        to: String,
        /// Replace the current history entry instead of pushing.
        replace: bool,
        /// Originally attempted location, for the post-login return.
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
}

impl GuardDecision {
    /// Guard state this decision corresponds to.
    pub fn state(&self) -> GuardState {
        match self {
            GuardDecision::Render => GuardState::Allowed,
            GuardDecision::Redirect { .. } => GuardState::Blocked,
        }
    }

    /// Check if the view is rendered.
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Gate for protected views.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl RouteGuard {
    /// Create a guard redirecting to `login_path`.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Login view path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide what happens when `location` is attempted in state `auth`.
    pub fn evaluate(&self, auth: &AuthSnapshot, location: &str) -> GuardDecision {
        if auth.is_authenticated || auth.is_logging_out {
            return GuardDecision::Render;
        }

        tracing::debug!(location, "redirecting unauthenticated visitor to login");
        GuardDecision::Redirect {
            to: self.login_path.clone(),
            replace: true,
            from: Some(location.to_string()),
        }
    }

    /// Evaluate against the store's current state.
    pub fn check(&self, store: &SessionStore, location: &str) -> GuardDecision {
        self.evaluate(&store.snapshot(), location)
    }

    /// Where to go after a successful login.
    ///
    /// Only local absolute paths are honoured, and never the login view
    /// itself; everything else lands on [`DEFAULT_HOME_PATH`].
    pub fn return_target(&self, from: Option<&str>) -> String {
        from.filter(|path| is_local_path(path))
            .filter(|path| strip_query(path).trim_end_matches('/') != self.login_path)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_HOME_PATH.to_string())
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
