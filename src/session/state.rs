//! Logout window state machine.

use tokio::time::Instant;

/// Whether a logout is in flight.
///
/// Transitions:
/// - `Idle -> LoggingOut` and `LoggingOut -> LoggingOut` on logout (new
///   generation, new deadline)
/// - `LoggingOut -> Idle` when the timer for the current generation fires,
///   when the deadline is observed to have passed, or on login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoutPhase {
    /// No logout pending.
    #[default]
    Idle,
    /// Redirects are suppressed until `deadline`.
    LoggingOut {
        /// End of the window.
        deadline: Instant,
        /// Identifies the logout call that opened this window.
        generation: u64,
    },
}

impl LogoutPhase {
    /// Check if the window is open at `now`.
    pub fn is_active_at(&self, now: Instant) -> bool {
        match self {
            LogoutPhase::Idle => false,
            LogoutPhase::LoggingOut { deadline, .. } => now < *deadline,
        }
    }

    /// Check if a window exists whose deadline has already passed.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self {
            LogoutPhase::Idle => false,
            LogoutPhase::LoggingOut { deadline, .. } => now >= *deadline,
        }
    }

    /// Check if the window belongs to the given generation.
    pub fn is_generation(&self, generation: u64) -> bool {
        matches!(self, LogoutPhase::LoggingOut { generation: g, .. } if *g == generation)
    }
}
