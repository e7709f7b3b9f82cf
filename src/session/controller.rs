use serde::{Deserialize, Serialize};

use super::machine::{reduce, SessionEvent, SessionState};
use crate::client::ApiClient;
use crate::error::Error;
use crate::store::TokenStore;
use crate::types::User;

/// Success payload of the auth endpoints (whoami, login, register).
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(rename = "usuario")]
    user: User,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "correo")]
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "nombre")]
    name: &'a str,
    #[serde(rename = "correo")]
    email: &'a str,
    password: &'a str,
}

/// One entry of the backend's validation-error array.
#[derive(Debug, Deserialize)]
struct ValidationError {
    msg: String,
}

/// Error body shape of the login/register endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    errors: Vec<ValidationError>,
}

/// Joins the validation messages with newlines, no trailing separator.
fn joined_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.msg.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display message for a rejected sign-in. Prefers a non-empty top-level
/// `msg` over the joined validation list.
fn sign_in_error_message(detail: &str) -> String {
    match serde_json::from_str::<ErrorBody>(detail) {
        Ok(body) => match body.msg.filter(|m| !m.is_empty()) {
            Some(msg) => msg,
            None => joined_messages(&body.errors),
        },
        Err(_) => detail.to_owned(),
    }
}

/// Display message for a rejected sign-up: always the joined validation
/// list, never the top-level `msg`.
fn sign_up_error_message(detail: &str) -> String {
    match serde_json::from_str::<ErrorBody>(detail) {
        Ok(body) => joined_messages(&body.errors),
        Err(_) => detail.to_owned(),
    }
}

/// Drives the session against the backend and the token store.
///
/// Owns the current [`SessionState`] and is the only place session events
/// are fired from; the state machine itself stays I/O-free. Transport
/// failures ([`Error::Http`]) are never absorbed into view state — they
/// propagate to the caller, which surfaces them however it sees fit.
pub struct SessionController<S> {
    api: ApiClient<S>,
    state: SessionState,
}

impl<S: TokenStore> SessionController<S> {
    /// Create a controller in the initial `Checking` state.
    #[must_use]
    pub fn new(api: ApiClient<S>) -> Self {
        Self {
            api,
            state: SessionState::default(),
        }
    }

    /// Current session state, for rendering.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn dispatch(&mut self, event: SessionEvent) {
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous, event);
    }

    /// Startup re-validation: resume the stored session, if any.
    ///
    /// With no stored token the session becomes `NotAuthenticated` without
    /// touching the network. Otherwise the whoami endpoint validates the
    /// token; rejection also means `NotAuthenticated` (not an error), and
    /// acceptance persists the possibly refreshed token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Store`] if
    /// the token store fails. Backend rejection is not an error here.
    pub async fn check_token(&mut self) -> Result<(), Error> {
        let stored = self.api.token_store().get().await.map_err(Error::Store)?;
        if stored.is_none() {
            self.dispatch(SessionEvent::NotAuthenticated);
            return Ok(());
        }

        match self.api.get::<AuthResponse>("/auth", "session renewal").await {
            Ok(auth) => self.accept(auth).await,
            Err(Error::Api { status, .. }) => {
                tracing::debug!(status, "stored token rejected");
                self.dispatch(SessionEvent::NotAuthenticated);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Sign in with email and password.
    ///
    /// On success the returned token is persisted and the session becomes
    /// `Authenticated`. Rejected credentials do not return an error: the
    /// backend's message lands in [`SessionState::error_message`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Store`] if
    /// the token store fails.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), Error> {
        let body = LoginRequest { email, password };
        match self
            .api
            .post::<AuthResponse, _>("/auth/login", &body, "sign-in")
            .await
        {
            Ok(auth) => self.accept(auth).await,
            Err(Error::Api { detail, .. }) => {
                self.dispatch(SessionEvent::AddError(sign_in_error_message(&detail)));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Register a new account.
    ///
    /// Success and failure behave exactly like [`sign_in`](Self::sign_in),
    /// except the rejection message is always the joined validation list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure or [`Error::Store`] if
    /// the token store fails.
    pub async fn sign_up(&mut self, name: &str, email: &str, password: &str) -> Result<(), Error> {
        let body = RegisterRequest {
            name,
            email,
            password,
        };
        match self
            .api
            .post::<AuthResponse, _>("/usuarios", &body, "sign-up")
            .await
        {
            Ok(auth) => self.accept(auth).await,
            Err(Error::Api { detail, .. }) => {
                self.dispatch(SessionEvent::AddError(sign_up_error_message(&detail)));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Sign out: delete the stored token and drop the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the token store fails; the session is
    /// left untouched in that case.
    pub async fn sign_out(&mut self) -> Result<(), Error> {
        self.api.token_store().remove().await.map_err(Error::Store)?;
        self.dispatch(SessionEvent::Logout);
        Ok(())
    }

    /// Clear the current error message, leaving the rest of the state alone.
    pub fn dismiss_error(&mut self) {
        self.dispatch(SessionEvent::RemoveError);
    }

    /// Persists the token, then transitions to `Authenticated`.
    async fn accept(&mut self, auth: AuthResponse) -> Result<(), Error> {
        self.api
            .token_store()
            .set(&auth.token)
            .await
            .map_err(Error::Store)?;
        self.dispatch(SessionEvent::SignUp {
            user: auth.user,
            token: auth.token,
        });
        Ok(())
    }
}
