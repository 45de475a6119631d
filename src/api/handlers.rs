//! HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use super::types::{
    ErrorResponse, GuardQuery, GuardResponse, LoginRequest, LoginResponse, PageQuery,
    SignupResponse,
};
use crate::forms::SignupForm;
use crate::guard::{GuardDecision, RouteGuard};
use crate::routes::{self, RouteMatch};
use crate::session::{AuthSnapshot, SessionStore, StoreConfig};
use crate::storage::{DurableStorage, MemoryStorage};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub guard: Arc<RouteGuard>,
}

impl AppState {
    /// In-memory state with default settings.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()), StoreConfig::default())
    }

    /// State backed by the given storage.
    pub fn with_storage(storage: Arc<dyn DurableStorage>, config: StoreConfig) -> Self {
        Self {
            store: SessionStore::open(storage, config),
            guard: Arc::new(RouteGuard::default()),
        }
    }

    pub fn with_guard(mut self, guard: RouteGuard) -> Self {
        self.guard = Arc::new(guard);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "grocefy",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Current authentication state.
pub async fn get_session(State(state): State<AppState>) -> Json<AuthSnapshot> {
    Json(state.store.snapshot())
}

/// Validate the login form and start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = req.form.validate().map_err(|errors| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(errors)),
        )
    })?;

    let user = state.store.login(credentials);
    let redirect_to = state.guard.return_target(req.from.as_deref());

    Ok(Json(LoginResponse { user, redirect_to }))
}

/// End the session.
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.store.logout();
    StatusCode::NO_CONTENT
}

/// Validate a sign-up form.
///
/// Accounts are not stored anywhere; a valid form just sends the visitor
/// back to the landing page.
pub async fn signup(
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let credentials = form.validate().map_err(|errors| {
        tracing::debug!(%errors, "sign-up validation failed");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation(errors)),
        )
    })?;

    tracing::info!(email = %credentials.email, "sign-up accepted");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            redirect_to: "/".to_string(),
        }),
    ))
}

/// Guard decision for an arbitrary path.
///
/// Public and unknown paths always render; only protected routes consult
/// the session.
pub async fn check_guard(
    State(state): State<AppState>,
    Query(query): Query<GuardQuery>,
) -> Result<Json<GuardResponse>, ApiError> {
    if !query.path.starts_with('/') {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("path must start with '/'")),
        ));
    }

    let route = routes::resolve(&query.path);
    let decision = match &route {
        Some(route) if route.protected => state.guard.check(&state.store, &query.path),
        _ => GuardDecision::Render,
    };

    Ok(Json(GuardResponse {
        path: query.path,
        route,
        decision,
    }))
}

/// Page navigation.
///
/// Resolves the path against the route table and, for protected views,
/// runs the route guard. Blocked visitors get `303 See Other` to the login
/// view with the attempted location in `from`.
pub async fn navigate(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let path = uri.path();
    let route = routes::resolve(path).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::route_not_found(path)),
        )
    })?;

    if !route.protected {
        return Ok(render(route, query.from));
    }

    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);

    match state.guard.check(&state.store, location) {
        GuardDecision::Render => Ok(render(route, None)),
        GuardDecision::Redirect { to, from, .. } => {
            let target = match from {
                Some(from) => format!("{to}?from={}", urlencoding::encode(&from)),
                None => to,
            };
            Ok((StatusCode::SEE_OTHER, [(header::LOCATION, target)]).into_response())
        }
    }
}

fn render(route: RouteMatch, from: Option<String>) -> Response {
    let mut body = serde_json::json!({
        "view": route.view,
        "protected": route.protected,
        "params": route.params,
    });
    if let Some(from) = from {
        body["from"] = serde_json::Value::String(from);
    }
    Json(body).into_response()
}
