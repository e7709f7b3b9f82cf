use crate::types::User;

/// Authentication status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Initial state: a stored token may exist but has not been validated.
    Checking,
    Authenticated,
    NotAuthenticated,
}

/// In-memory session view state.
///
/// Invariant: `status == Authenticated` exactly when both `token` and
/// `user` are present; otherwise both are absent. Holds after every
/// [`reduce`] transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub token: Option<String>,
    pub user: Option<User>,
    /// Display string for the last rejected sign-in/sign-up, if any.
    pub error_message: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Checking,
            token: None,
            user: None,
            error_message: None,
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

/// Session transition events. Fired by
/// [`SessionController`](super::SessionController); never carry I/O.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Credentials accepted (sign-in, sign-up, or token renewal).
    SignUp { user: User, token: String },
    /// No usable session (no stored token, or the backend rejected it).
    NotAuthenticated,
    /// User-initiated sign-out.
    Logout,
    /// Sign-in/sign-up rejected with a user-facing message.
    AddError(String),
    /// Clear the error message, leaving the rest of the state alone.
    RemoveError,
}

/// Applies one event to the session state.
///
/// Total over `(state, event)` with no guard conditions: the next state
/// depends only on the event, except [`SessionEvent::RemoveError`] which
/// preserves everything but the message.
#[must_use]
pub fn reduce(state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::SignUp { user, token } => SessionState {
            status: SessionStatus::Authenticated,
            token: Some(token),
            user: Some(user),
            error_message: None,
        },
        SessionEvent::NotAuthenticated | SessionEvent::Logout => SessionState {
            status: SessionStatus::NotAuthenticated,
            token: None,
            user: None,
            error_message: None,
        },
        SessionEvent::AddError(message) => SessionState {
            status: SessionStatus::NotAuthenticated,
            token: None,
            user: None,
            error_message: Some(message),
        },
        SessionEvent::RemoveError => SessionState {
            error_message: None,
            ..state
        },
    }
}
