//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::forms::{FormErrors, LoginForm};
use crate::guard::GuardDecision;
use crate::routes::RouteMatch;
use crate::session::SessionUser;

/// Login request body.
///
/// The form fields are flattened; `from` carries the location the guard
/// originally redirected away from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(flatten)]
    pub form: LoginForm,
    #[serde(default)]
    pub from: Option<String>,
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
    /// Where the front-end should navigate next.
    pub redirect_to: String,
}

/// Response for a successful sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub redirect_to: String,
}

/// Query for the guard endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardQuery {
    pub path: String,
}

/// Guard decision for a path, together with the resolved route.
#[derive(Debug, Clone, Serialize)]
pub struct GuardResponse {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteMatch>,
    pub decision: GuardDecision,
}

/// Query accepted by page navigations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub from: Option<String>,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "VALIDATION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FormErrors>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fields: None,
        }
    }

    pub fn validation(errors: FormErrors) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: errors.to_string(),
            fields: Some(errors),
        }
    }

    pub fn route_not_found(path: &str) -> Self {
        Self::new("ROUTE_NOT_FOUND", format!("No view is mounted at '{}'", path))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}
