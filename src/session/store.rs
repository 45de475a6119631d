//! Session store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::{Credentials, LogoutPhase, SessionUser};
use crate::storage::DurableStorage;

/// Storage key holding the serialized [`SessionUser`].
pub const STORAGE_KEY: &str = "grocefyUser";

/// Default length of the logging-out window.
pub const DEFAULT_LOGOUT_WINDOW: Duration = Duration::from_millis(400);

/// Session store settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Key the session is mirrored under.
    pub storage_key: String,
    /// How long redirects stay suppressed after a logout.
    pub logout_window: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            logout_window: DEFAULT_LOGOUT_WINDOW,
        }
    }
}

impl StoreConfig {
    pub fn with_logout_window(mut self, window: Duration) -> Self {
        self.logout_window = window;
        self
    }
}

/// Point-in-time view of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    /// Current user, if logged in.
    pub user: Option<SessionUser>,
    /// `true` iff `user` is present.
    pub is_authenticated: bool,
    /// `true` while the logging-out window is open.
    pub is_logging_out: bool,
}

impl AuthSnapshot {
    /// Snapshot of a logged-out store with no pending logout.
    pub fn logged_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_logging_out: false,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    user: Option<SessionUser>,
    phase: LogoutPhase,
    timer: Option<AbortHandle>,
    generation: u64,
}

impl StoreState {
    fn snapshot(&self, now: Instant) -> AuthSnapshot {
        AuthSnapshot {
            user: self.user.clone(),
            is_authenticated: self.user.is_some(),
            is_logging_out: self.phase.is_active_at(now),
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    storage: Arc<dyn DurableStorage>,
    config: StoreConfig,
    state: Mutex<StoreState>,
    changes: watch::Sender<AuthSnapshot>,
}

/// Holder of the current session.
///
/// Cloning the store yields another handle to the same session; the store is
/// passed explicitly to whoever needs it rather than living in a global.
/// Every change is mirrored to the [`DurableStorage`] backend and published
/// to [`SessionStore::subscribe`] receivers.
///
/// None of the operations fail: storage errors are logged and the in-memory
/// session stays authoritative.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Open the store, hydrating the session from storage.
    ///
    /// A stored record that fails the schema check is treated as absent and
    /// removed.
    pub fn open(storage: Arc<dyn DurableStorage>, config: StoreConfig) -> Self {
        let user = hydrate(storage.as_ref(), &config.storage_key);

        let state = StoreState {
            user,
            ..StoreState::default()
        };
        let (changes, _) = watch::channel(state.snapshot(Instant::now()));

        Self {
            inner: Arc::new(Inner {
                storage,
                config,
                state: Mutex::new(state),
                changes,
            }),
        }
    }

    /// Log in, replacing any current session.
    pub fn login(&self, credentials: Credentials) -> SessionUser {
        let user = SessionUser::from_credentials(credentials);

        let mut state = self.lock();
        state.cancel_timer();
        state.phase = LogoutPhase::Idle;
        state.user = Some(user.clone());
        self.persist(state.user.as_ref());
        self.publish(&state);
        drop(state);

        tracing::info!(email = %user.email, "user logged in");
        user
    }

    /// Log out and open the logging-out window.
    ///
    /// Calling this while a window is already open cancels the pending timer
    /// and starts a fresh window.
    pub fn logout(&self) {
        let window = self.inner.config.logout_window;
        let deadline = Instant::now() + window;

        let mut state = self.lock();
        state.cancel_timer();
        state.generation += 1;
        let generation = state.generation;
        state.phase = LogoutPhase::LoggingOut {
            deadline,
            generation,
        };
        let previous = state.user.take();
        self.persist(None);
        state.timer = self.spawn_timer(deadline, generation);
        self.publish(&state);
        drop(state);

        match previous {
            Some(user) => tracing::info!(email = %user.email, "user logged out"),
            None => tracing::debug!("logout without an active session"),
        }
    }

    /// Current user, if any.
    pub fn user(&self) -> Option<SessionUser> {
        self.lock().user.clone()
    }

    /// Check whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// Check whether the logging-out window is open.
    pub fn is_logging_out(&self) -> bool {
        self.snapshot().is_logging_out
    }

    /// Current authentication state.
    pub fn snapshot(&self) -> AuthSnapshot {
        let now = Instant::now();
        let mut state = self.lock();
        self.close_expired_window(&mut state, now);
        state.snapshot(now)
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.changes.subscribe()
    }

    /// Configured logging-out window.
    pub fn logout_window(&self) -> Duration {
        self.inner.config.logout_window
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &StoreState) {
        self.inner
            .changes
            .send_replace(state.snapshot(Instant::now()));
    }

    fn persist(&self, user: Option<&SessionUser>) {
        let key = &self.inner.config.storage_key;
        let result = match user {
            Some(user) => user
                .to_json()
                .and_then(|json| self.inner.storage.set(key, &json)),
            None => self.inner.storage.remove(key),
        };

        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "failed to mirror session to storage");
        }
    }

    /// Arm the timer that closes the window for `generation`.
    ///
    /// Outside a tokio runtime no task is spawned; the window then closes
    /// lazily the next time the state is read.
    fn spawn_timer(&self, deadline: Instant, generation: u64) -> Option<AbortHandle> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let inner = Arc::downgrade(&self.inner);

        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(store) = upgrade(&inner) {
                store.finish_logout(generation);
            }
        });
        Some(task.abort_handle())
    }

    fn finish_logout(&self, generation: u64) {
        let mut state = self.lock();
        if !state.phase.is_generation(generation) {
            return;
        }
        state.phase = LogoutPhase::Idle;
        state.timer = None;
        self.publish(&state);
        tracing::debug!(generation, "logging-out window closed");
    }

    fn close_expired_window(&self, state: &mut StoreState, now: Instant) {
        if state.phase.is_expired_at(now) {
            state.cancel_timer();
            state.phase = LogoutPhase::Idle;
            self.publish(state);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.inner.config)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

fn upgrade(inner: &Weak<Inner>) -> Option<SessionStore> {
    inner.upgrade().map(|inner| SessionStore { inner })
}

fn hydrate(storage: &dyn DurableStorage, key: &str) -> Option<SessionUser> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read stored session");
            return None;
        }
    };

    match SessionUser::from_json(&raw) {
        Ok(user) => {
            tracing::info!(email = %user.email, "session restored from storage");
            Some(user)
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "discarding malformed stored session");
            if let Err(e) = storage.remove(key) {
                tracing::warn!(key = %key, error = %e, "failed to remove malformed session");
            }
            None
        }
    }
}
